use serde::{Deserialize, Serialize};

use super::audio_models::EncodedPacket;
use super::error::InterceptorError;

/// Event kinds listeners can subscribe to.
///
/// The string form is the name the event is known by on the event surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "resume")]
    Resume,
    #[serde(rename = "rpause")]
    RenderPause,
    #[serde(rename = "rresume")]
    RenderResume,
    #[serde(rename = "rfforward")]
    RenderFastForward,
    #[serde(rename = "streamReady")]
    StreamReady,
    #[serde(rename = "streamError")]
    StreamError,
    #[serde(rename = "workerError")]
    WorkerError,
    #[serde(rename = "dataAvailable")]
    DataAvailable,
    #[serde(rename = "rqupdate")]
    RenderQueueUpdate,
    #[serde(rename = "ridle")]
    RenderIdle,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        Self::Start,
        Self::Stop,
        Self::Pause,
        Self::Resume,
        Self::RenderPause,
        Self::RenderResume,
        Self::RenderFastForward,
        Self::StreamReady,
        Self::StreamError,
        Self::WorkerError,
        Self::DataAvailable,
        Self::RenderQueueUpdate,
        Self::RenderIdle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::RenderPause => "rpause",
            Self::RenderResume => "rresume",
            Self::RenderFastForward => "rfforward",
            Self::StreamReady => "streamReady",
            Self::StreamError => "streamError",
            Self::WorkerError => "workerError",
            Self::DataAvailable => "dataAvailable",
            Self::RenderQueueUpdate => "rqupdate",
            Self::RenderIdle => "ridle",
        }
    }
}

/// A notification emitted by the interceptor, with its detail payload.
#[derive(Debug, Clone, PartialEq)]
pub enum InterceptorEvent {
    Start,
    /// The encoder finished flushing its output stream.
    Stop,
    Pause,
    Resume,
    RenderPause,
    RenderResume,
    RenderFastForward,
    StreamReady,
    StreamError(InterceptorError),
    WorkerError(InterceptorError),
    /// One encoded unit, passed through verbatim from the encoder.
    DataAvailable(EncodedPacket),
    /// New render queue length.
    RenderQueueUpdate(usize),
    /// Idle counter value after this quantum (or after a reset).
    RenderIdle(u64),
}

impl InterceptorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start => EventKind::Start,
            Self::Stop => EventKind::Stop,
            Self::Pause => EventKind::Pause,
            Self::Resume => EventKind::Resume,
            Self::RenderPause => EventKind::RenderPause,
            Self::RenderResume => EventKind::RenderResume,
            Self::RenderFastForward => EventKind::RenderFastForward,
            Self::StreamReady => EventKind::StreamReady,
            Self::StreamError(_) => EventKind::StreamError,
            Self::WorkerError(_) => EventKind::WorkerError,
            Self::DataAvailable(_) => EventKind::DataAvailable,
            Self::RenderQueueUpdate(_) => EventKind::RenderQueueUpdate,
            Self::RenderIdle(_) => EventKind::RenderIdle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_match_serde_names() {
        for kind in EventKind::ALL {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn serde_uses_surface_names() {
        assert_eq!(serde_json::to_string(&EventKind::RenderIdle).unwrap(), "\"ridle\"");
        let kind: EventKind = serde_json::from_str("\"dataAvailable\"").unwrap();
        assert_eq!(kind, EventKind::DataAvailable);
    }

    #[test]
    fn event_kind_matches_payload() {
        assert_eq!(InterceptorEvent::RenderQueueUpdate(3).kind(), EventKind::RenderQueueUpdate);
        assert_eq!(InterceptorEvent::DataAvailable(vec![1]).name(), "dataAvailable");
        assert_eq!(
            InterceptorEvent::StreamError(InterceptorError::PermissionDenied).name(),
            "streamError"
        );
    }
}
