use crate::models::event::InterceptorEvent;

/// Receives interceptor notifications.
///
/// Called synchronously on whichever thread emitted the event: the control
/// caller, the real-time audio thread (`rqupdate`, `ridle`) or a link's
/// inbound thread (`dataAvailable`, `stop`, decode-side `rqupdate`). Keep
/// implementations short and marshal to a UI thread if needed.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &InterceptorEvent);
}

impl<F> EventListener for F
where
    F: Fn(&InterceptorEvent) + Send + Sync,
{
    fn on_event(&self, event: &InterceptorEvent) {
        self(event)
    }
}
