use thiserror::Error;

/// Errors surfaced by the interceptor.
///
/// Only construction returns these directly. Everything else reaches callers
/// through `streamError` / `workerError` events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterceptorError {
    #[error("audio capture is not supported on this platform")]
    Unsupported,

    #[error("permission denied")]
    PermissionDenied,

    #[error("stream acquisition failed: {0}")]
    StreamAcquisition(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("worker failed: {0}")]
    WorkerFailed(String),

    #[error("link closed")]
    LinkClosed,
}
