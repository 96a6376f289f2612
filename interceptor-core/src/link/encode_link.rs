use crossbeam_channel::Sender;

use super::port::WorkerReply;
use super::spawn_link;
use crate::models::audio_models::{ChannelBuffers, EncodedPacket};
use crate::models::config::InterceptorConfig;
use crate::models::error::InterceptorError;
use crate::traits::worker::{EncoderMessage, EncoderWorker};

/// Outbound channel to an encoder worker.
///
/// Created on `start()` and dropped on `stop()` after `done` has been
/// queued; the worker keeps draining whatever was queued before that.
pub struct EncodeLink {
    commands: Sender<EncoderMessage>,
}

impl EncodeLink {
    /// Spawn `worker` on its own thread and send it the `init` snapshot.
    ///
    /// `on_reply` runs on the link's inbound thread for every unit the
    /// worker posts, and once more for the end-of-stream sentinel.
    pub fn spawn<H>(
        mut worker: Box<dyn EncoderWorker>,
        config: &InterceptorConfig,
        on_reply: H,
    ) -> Result<Self, InterceptorError>
    where
        H: FnMut(WorkerReply<EncodedPacket>) + Send + 'static,
    {
        let commands = spawn_link(
            "encoder-link",
            move |message, port| worker.on_message(message, port),
            on_reply,
        )?;
        let link = Self { commands };
        link.send(EncoderMessage::Init(Box::new(config.clone())))?;
        log::debug!("encoder link started ({})", config.encoder_path);
        Ok(link)
    }

    /// Queue one quantum for encoding. Never blocks.
    pub fn encode(&self, buffers: ChannelBuffers) -> Result<(), InterceptorError> {
        self.send(EncoderMessage::Encode(buffers))
    }

    /// Ask the worker to flush and end its output stream.
    pub fn done(&self) -> Result<(), InterceptorError> {
        self.send(EncoderMessage::Done)
    }

    fn send(&self, message: EncoderMessage) -> Result<(), InterceptorError> {
        self.commands.send(message).map_err(|_| InterceptorError::LinkClosed)
    }
}
