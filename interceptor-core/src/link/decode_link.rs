use crossbeam_channel::Sender;

use super::port::WorkerReply;
use super::spawn_link;
use crate::models::audio_models::ChannelBuffers;
use crate::models::config::DecoderInit;
use crate::models::error::InterceptorError;
use crate::traits::worker::{DecoderMessage, DecoderWorker};

/// Inbound channel from a decoder worker. Lives as long as the interceptor.
pub struct DecodeLink {
    commands: Sender<DecoderMessage>,
}

impl DecodeLink {
    pub fn spawn<H>(
        mut worker: Box<dyn DecoderWorker>,
        init: DecoderInit,
        on_reply: H,
    ) -> Result<Self, InterceptorError>
    where
        H: FnMut(WorkerReply<ChannelBuffers>) + Send + 'static,
    {
        let commands = spawn_link(
            "decoder-link",
            move |message, port| worker.on_message(message, port),
            on_reply,
        )?;
        let link = Self { commands };
        link.send(DecoderMessage::Init(init))?;
        log::debug!(
            "decoder link started ({} Hz in, {} Hz out, raw={})",
            init.decoder_sample_rate,
            init.output_buffer_sample_rate,
            init.raw_packet
        );
        Ok(link)
    }

    /// Hand compressed data to the decoder. Ownership moves to the worker.
    pub fn decode(&self, data: Vec<u8>) -> Result<(), InterceptorError> {
        self.send(DecoderMessage::Decode(data))
    }

    fn send(&self, message: DecoderMessage) -> Result<(), InterceptorError> {
        self.commands.send(message).map_err(|_| InterceptorError::LinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossbeam_channel::unbounded;

    use super::*;
    use crate::link::port::ReplyPort;
    use crate::models::config::InterceptorConfig;

    /// Turns every byte of a `decode` payload into one single-sample unit.
    struct ByteSplitter {
        initialized: bool,
    }

    impl DecoderWorker for ByteSplitter {
        fn on_message(&mut self, message: DecoderMessage, port: &ReplyPort<ChannelBuffers>) {
            match message {
                DecoderMessage::Init(_) => self.initialized = true,
                DecoderMessage::Decode(data) if self.initialized => {
                    for byte in data {
                        port.post(vec![vec![byte as f32]]);
                    }
                }
                DecoderMessage::Decode(_) => port.fail(InterceptorError::WorkerFailed("not initialized".into())),
            }
        }
    }

    #[test]
    fn decoded_units_preserve_order() {
        let (tx, rx) = unbounded();
        let init = InterceptorConfig::default().decoder_init();
        let link = DecodeLink::spawn(Box::new(ByteSplitter { initialized: false }), init, move |reply| {
            let _ = tx.send(reply);
        })
        .unwrap();

        link.decode(vec![3, 1]).unwrap();
        link.decode(vec![2]).unwrap();

        let timeout = Duration::from_secs(5);
        let got: Vec<_> = (0..3).map(|_| rx.recv_timeout(timeout).unwrap()).collect();
        assert_eq!(
            got,
            vec![
                WorkerReply::Data(vec![vec![3.0]]),
                WorkerReply::Data(vec![vec![1.0]]),
                WorkerReply::Data(vec![vec![2.0]]),
            ]
        );
    }
}
