use crate::link::port::ReplyPort;
use crate::models::audio_models::{ChannelBuffers, EncodedPacket};
use crate::models::config::{DecoderInit, InterceptorConfig};
use crate::models::error::InterceptorError;

/// Commands accepted by an encoder worker, in the order the link sends them.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderMessage {
    /// Full configuration snapshot, sent once when the worker is spawned.
    Init(Box<InterceptorConfig>),
    /// One quantum of input, one buffer per channel.
    Encode(ChannelBuffers),
    /// Flush and terminate the output stream.
    Done,
}

/// Commands accepted by a decoder worker.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderMessage {
    Init(DecoderInit),
    /// Compressed data fed in from outside.
    Decode(Vec<u8>),
}

/// An encoder running behind an [`EncodeLink`](crate::link::encode_link::EncodeLink).
///
/// Runs on the link's own thread. Encoded units go out through `port`;
/// `port.end()` marks the end of the output stream and is expected after
/// [`EncoderMessage::Done`].
pub trait EncoderWorker: Send + 'static {
    fn on_message(&mut self, message: EncoderMessage, port: &ReplyPort<EncodedPacket>);
}

/// A decoder running behind a [`DecodeLink`](crate::link::decode_link::DecodeLink).
///
/// Every unit posted must hold `number_of_channels` buffers of exactly
/// `buffer_length` samples; anything else is dropped by the interceptor.
pub trait DecoderWorker: Send + 'static {
    fn on_message(&mut self, message: DecoderMessage, port: &ReplyPort<ChannelBuffers>);
}

/// Creates workers from the configured encoder/decoder path.
pub trait WorkerFactory: Send + Sync {
    fn create_encoder(&self, path: &str) -> Result<Box<dyn EncoderWorker>, InterceptorError>;

    fn create_decoder(&self, path: &str) -> Result<Box<dyn DecoderWorker>, InterceptorError>;
}
