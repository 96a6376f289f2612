use std::collections::VecDeque;

use crate::models::audio_models::ChannelBuffers;

/// FIFO of decoded units awaiting playback.
///
/// Every unit holds `number_of_channels` buffers of exactly `quantum_length`
/// samples, so one unit fills one output quantum. Wrap in
/// `parking_lot::Mutex` to share between the audio thread and the decoder's
/// inbound thread.
///
/// Unbounded unless a capacity is given. With a capacity, enqueueing into a
/// full queue drops the oldest unit.
#[derive(Debug)]
pub struct RenderQueue {
    units: VecDeque<ChannelBuffers>,
    number_of_channels: usize,
    quantum_length: usize,
    capacity: Option<usize>,
}

/// What happened to a unit offered to [`RenderQueue::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Appended,
    /// Appended after evicting the oldest unit.
    Evicted,
    /// Wrong shape; not queued.
    Rejected,
}

impl RenderQueue {
    pub fn new(number_of_channels: usize, quantum_length: usize, capacity: Option<usize>) -> Self {
        Self {
            units: VecDeque::new(),
            number_of_channels,
            quantum_length,
            capacity,
        }
    }

    /// Whether `unit` has the shape this queue stores.
    pub fn accepts(&self, unit: &ChannelBuffers) -> bool {
        unit.len() == self.number_of_channels && unit.iter().all(|ch| ch.len() == self.quantum_length)
    }

    /// Append a unit at the tail.
    pub fn enqueue(&mut self, unit: ChannelBuffers) -> Enqueued {
        if !self.accepts(&unit) {
            return Enqueued::Rejected;
        }

        let mut outcome = Enqueued::Appended;
        if let Some(capacity) = self.capacity {
            if self.units.len() >= capacity {
                self.units.pop_front();
                outcome = Enqueued::Evicted;
            }
        }
        self.units.push_back(unit);
        outcome
    }

    /// Remove and return the oldest unit.
    pub fn dequeue(&mut self) -> Option<ChannelBuffers> {
        self.units.pop_front()
    }

    /// Drop everything queued. Returns how many units were discarded.
    pub fn flush(&mut self) -> usize {
        let dropped = self.units.len();
        self.units.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(value: f32) -> ChannelBuffers {
        vec![vec![value; 4], vec![-value; 4]]
    }

    #[test]
    fn fifo_order() {
        let mut q = RenderQueue::new(2, 4, None);
        q.enqueue(unit(1.0));
        q.enqueue(unit(2.0));
        q.enqueue(unit(3.0));

        assert_eq!(q.len(), 3);
        assert_eq!(q.dequeue(), Some(unit(1.0)));
        assert_eq!(q.dequeue(), Some(unit(2.0)));
        assert_eq!(q.dequeue(), Some(unit(3.0)));
        assert!(q.is_empty());
    }

    #[test]
    fn dequeue_empty_returns_none() {
        let mut q = RenderQueue::new(2, 4, None);
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn rejects_wrong_shape() {
        let mut q = RenderQueue::new(2, 4, None);
        assert_eq!(q.enqueue(vec![vec![0.0; 4]]), Enqueued::Rejected);
        assert_eq!(q.enqueue(vec![vec![0.0; 4], vec![0.0; 3]]), Enqueued::Rejected);
        assert_eq!(q.enqueue(vec![vec![0.0; 5], vec![0.0; 5]]), Enqueued::Rejected);
        assert!(q.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut q = RenderQueue::new(2, 4, Some(2));
        assert_eq!(q.enqueue(unit(1.0)), Enqueued::Appended);
        assert_eq!(q.enqueue(unit(2.0)), Enqueued::Appended);
        assert_eq!(q.enqueue(unit(3.0)), Enqueued::Evicted);

        assert_eq!(q.len(), 2);
        assert_eq!(q.dequeue(), Some(unit(2.0)));
        assert_eq!(q.dequeue(), Some(unit(3.0)));
    }

    #[test]
    fn flush_reports_dropped_count() {
        let mut q = RenderQueue::new(2, 4, None);
        assert_eq!(q.flush(), 0);

        q.enqueue(unit(1.0));
        q.enqueue(unit(2.0));
        assert_eq!(q.flush(), 2);
        assert!(q.is_empty());
    }
}
