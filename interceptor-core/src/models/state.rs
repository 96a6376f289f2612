use serde::{Deserialize, Serialize};

/// Capture-side state machine.
///
/// ```text
/// inactive → recording ⇄ paused
///     ↑          │          │
///     └──────────┴──────────┘  (stop)
/// ```
///
/// Every transition helper returns `None` when the transition is not valid
/// from the current state; callers treat that as a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Inactive,
    Recording,
    Paused,
}

impl CaptureState {
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// `start` also requires a live stream; the orchestrator checks that.
    pub fn start(self) -> Option<Self> {
        match self {
            Self::Inactive => Some(Self::Recording),
            _ => None,
        }
    }

    pub fn pause(self) -> Option<Self> {
        match self {
            Self::Recording => Some(Self::Paused),
            _ => None,
        }
    }

    pub fn resume(self) -> Option<Self> {
        match self {
            Self::Paused => Some(Self::Recording),
            _ => None,
        }
    }

    pub fn stop(self) -> Option<Self> {
        match self {
            Self::Inactive => None,
            _ => Some(Self::Inactive),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Recording => "recording",
            Self::Paused => "paused",
        }
    }
}

/// Playback-side state machine, independent of [`CaptureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    #[default]
    Running,
    Paused,
}

impl RenderState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn pause(self) -> Option<Self> {
        match self {
            Self::Running => Some(Self::Paused),
            Self::Paused => None,
        }
    }

    pub fn resume(self) -> Option<Self> {
        match self {
            Self::Paused => Some(Self::Running),
            Self::Running => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Op {
        Start,
        Pause,
        Resume,
        Stop,
    }

    fn apply(state: CaptureState, op: Op) -> CaptureState {
        let next = match op {
            Op::Start => state.start(),
            Op::Pause => state.pause(),
            Op::Resume => state.resume(),
            Op::Stop => state.stop(),
        };
        next.unwrap_or(state)
    }

    #[test]
    fn full_cycle() {
        let s = CaptureState::default();
        assert!(s.is_inactive());
        let s = s.start().unwrap();
        assert!(s.is_recording());
        let s = s.pause().unwrap();
        assert!(s.is_paused());
        let s = s.resume().unwrap();
        assert!(s.is_recording());
        assert_eq!(s.stop(), Some(CaptureState::Inactive));
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert_eq!(CaptureState::Inactive.pause(), None);
        assert_eq!(CaptureState::Inactive.resume(), None);
        assert_eq!(CaptureState::Inactive.stop(), None);
        assert_eq!(CaptureState::Recording.start(), None);
        assert_eq!(CaptureState::Recording.resume(), None);
        assert_eq!(CaptureState::Paused.start(), None);
        assert_eq!(CaptureState::Paused.pause(), None);
        assert_eq!(CaptureState::Paused.stop(), Some(CaptureState::Inactive));
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let ops = [Op::Start, Op::Pause, Op::Resume, Op::Stop];
        for &first in &ops {
            for &second in &ops {
                for init in [CaptureState::Inactive, CaptureState::Recording, CaptureState::Paused] {
                    let once = apply(apply(init, first), second);
                    let twice = apply(apply(apply(init, first), second), second);
                    assert_eq!(once, twice);
                }
            }
        }
    }

    #[test]
    fn render_state_toggles() {
        let r = RenderState::default();
        assert!(r.is_running());
        assert_eq!(r.resume(), None);
        let r = r.pause().unwrap();
        assert_eq!(r.pause(), None);
        assert_eq!(r.resume(), Some(RenderState::Running));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CaptureState::Recording).unwrap(), "\"recording\"");
        assert_eq!(serde_json::to_string(&RenderState::Paused).unwrap(), "\"paused\"");
    }
}
