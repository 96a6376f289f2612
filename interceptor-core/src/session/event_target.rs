use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::event::{EventKind, InterceptorEvent};
use crate::traits::event_listener::EventListener;

/// Handle returned when a listener is registered, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerList = Arc<Vec<(ListenerId, Arc<dyn EventListener>)>>;

/// Observer registry: event kind → listeners in registration order.
///
/// Lists are copy-on-write so dispatching only clones an `Arc`, which keeps
/// the real-time path allocation-free. Dispatch works from a snapshot:
/// listeners added or removed during a dispatch take effect on the next one.
/// Events are never buffered for listeners that subscribe later.
#[derive(Default)]
pub struct EventTarget {
    listeners: RwLock<HashMap<EventKind, ListenerList>>,
    next_id: AtomicU64,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, kind: EventKind, listener: Arc<dyn EventListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut map = self.listeners.write();
        let list = map.entry(kind).or_default();
        let mut updated = Vec::with_capacity(list.len() + 1);
        updated.extend(list.iter().cloned());
        updated.push((id, listener));
        *list = Arc::new(updated);
        id
    }

    /// Returns `false` if no listener with `id` was registered for `kind`.
    pub fn remove(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut map = self.listeners.write();
        let Some(list) = map.get_mut(&kind) else {
            return false;
        };
        if !list.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        let updated: Vec<_> = list.iter().filter(|(existing, _)| *existing != id).cloned().collect();
        *list = Arc::new(updated);
        true
    }

    /// Deliver `event` synchronously to every current listener of its kind.
    pub fn dispatch(&self, event: &InterceptorEvent) {
        let snapshot = self.listeners.read().get(&event.kind()).cloned();
        if let Some(list) = snapshot {
            for (_, listener) in list.iter() {
                listener.on_event(event);
            }
        }
    }
}
