use std::fmt;

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No capture in flight. Counter reads zero once a new session starts.
    #[default]
    Idle,
    /// Capture running and the elapsed-time counter advancing.
    Recording,
    /// Counter frozen. The underlying capture keeps running.
    Paused,
    /// Stop requested, waiting for the device to finish the capture.
    Stopping,
}

impl SessionState {
    /// Whether a capture handle is held in this state.
    pub fn has_capture(self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Paused => "paused",
            SessionState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}
