use crate::models::config::MediaConstraints;
use crate::models::error::InterceptorError;

/// Platform entry point for live audio input.
///
/// Implemented by platform backends (an audio host plus its capture API).
/// The interceptor never talks to audio hardware itself; the backend drives
/// the real-time callback through a
/// [`QuantumProcessor`](crate::session::processor::QuantumProcessor).
pub trait StreamProvider: Send + Sync {
    /// Whether the platform offers both an audio context and media capture.
    fn is_supported(&self) -> bool;

    /// Sample rate of the platform audio context, in Hz.
    fn sample_rate(&self) -> u32;

    /// Request a live input stream. May block while the platform asks the
    /// user for permission.
    fn acquire(&self, constraints: &MediaConstraints) -> Result<Box<dyn LiveStream>, InterceptorError>;
}

/// Ownership of an acquired input stream (its tracks/devices).
pub trait LiveStream: Send {
    /// Identifier of the underlying stream, for logging.
    fn id(&self) -> String;

    /// Stop every track and release the device.
    fn release(&mut self);
}
