use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::models::error::InterceptorError;

/// Message travelling from a worker back to the interceptor.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerReply<T> {
    Data(T),
    /// End-of-stream sentinel.
    End,
    Failed(InterceptorError),
}

/// Outbound half of a worker's result channel.
///
/// Posting never blocks. Once the interceptor side is gone, posts are
/// silently discarded.
#[derive(Debug)]
pub struct ReplyPort<T> {
    tx: Sender<WorkerReply<T>>,
}

impl<T> ReplyPort<T> {
    /// A port plus the receiver that observes everything posted to it.
    pub fn channel() -> (Self, Receiver<WorkerReply<T>>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    pub fn post(&self, data: T) {
        let _ = self.tx.send(WorkerReply::Data(data));
    }

    pub fn end(&self) {
        let _ = self.tx.send(WorkerReply::End);
    }

    pub fn fail(&self, error: InterceptorError) {
        let _ = self.tx.send(WorkerReply::Failed(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_arrive_in_order() {
        let (port, rx) = ReplyPort::channel();
        port.post(1u8);
        port.post(2u8);
        port.fail(InterceptorError::LinkClosed);
        port.end();

        let replies: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            replies,
            vec![
                WorkerReply::Data(1),
                WorkerReply::Data(2),
                WorkerReply::Failed(InterceptorError::LinkClosed),
                WorkerReply::End,
            ]
        );
    }

    #[test]
    fn posting_after_receiver_dropped_is_harmless() {
        let (port, rx) = ReplyPort::channel();
        drop(rx);
        port.post(vec![0u8; 4]);
        port.end();
    }
}
