use crate::{CaptureOutput, ClosePrompt, SessionState, session::format_elapsed};

/// Terminal notifications emitted to the host.
///
/// None of these are fatal: each leaves the session in
/// [`SessionState::Idle`] ready for a new `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Capture finished and produced an output file.
    RecordingCompleted {
        /// The finished recording.
        output: CaptureOutput,
    },
    /// The device could not begin capturing.
    StartFailed {
        /// Description of the failure.
        reason: String,
    },
    /// Capture terminated abnormally mid-session.
    RecordingFailed {
        /// Description of the failure.
        reason: String,
    },
    /// An explicit stop did not complete cleanly.
    StopFailed {
        /// Description of the failure.
        reason: String,
    },
    /// The recording screen should exit now.
    ExitRequested,
}

/// Observable view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current lifecycle state.
    pub state: SessionState,
    /// Seconds counted while recording.
    pub elapsed_seconds: u64,
    /// `elapsed_seconds` formatted for display.
    pub display: String,
    /// Confirmation to show, if a mid-session close is pending.
    pub close_prompt: Option<ClosePrompt>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            elapsed_seconds: 0,
            display: format_elapsed(0),
            close_prompt: None,
        }
    }
}
