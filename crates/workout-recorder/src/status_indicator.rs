use std::fmt;

use workout_recorder_core::{SessionSnapshot, SessionState};

/// What the recording screen shows for a given session snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Ready to start recording.
    Ready,
    /// Recording with the formatted elapsed time.
    Recording {
        /// Elapsed time as shown to the user.
        display: String,
    },
    /// Counter frozen.
    Paused,
    /// Waiting for the camera to finish writing.
    Saving,
}

impl StatusIndicator {
    /// Controls available in this state.
    pub fn controls(&self) -> &'static str {
        match self {
            StatusIndicator::Ready => "start | close",
            StatusIndicator::Recording { .. } => "pause | finish | close",
            StatusIndicator::Paused => "resume | finish | close",
            StatusIndicator::Saving => "close",
        }
    }
}

impl From<&SessionSnapshot> for StatusIndicator {
    fn from(snapshot: &SessionSnapshot) -> Self {
        match snapshot.state {
            SessionState::Idle => StatusIndicator::Ready,
            SessionState::Recording => StatusIndicator::Recording {
                display: snapshot.display.clone(),
            },
            SessionState::Paused => StatusIndicator::Paused,
            SessionState::Stopping => StatusIndicator::Saving,
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusIndicator::Ready => write!(f, "Ready"),
            StatusIndicator::Recording { display } => write!(f, "\u{25CF} REC {}", display),
            StatusIndicator::Paused => write!(f, "PAUSED"),
            StatusIndicator::Saving => write!(f, "Saving..."),
        }
    }
}
