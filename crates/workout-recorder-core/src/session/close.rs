/// Progress of a close request for the recording screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePhase {
    /// No close requested.
    #[default]
    None,
    /// User asked to close mid-session and has not answered the prompt yet.
    AwaitingConfirmation,
    /// Exit as soon as the pending stop resolves.
    ExitAfterStop,
}

/// Result of asking to close the recording screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Nothing is recording; the screen may exit immediately.
    ExitNow,
    /// A session is active; the user must confirm before anything is stopped.
    ConfirmationRequired,
    /// A stop is already in flight; exit follows once it resolves.
    ExitAfterStop,
}

/// Confirmation shown when closing during an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosePrompt {
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub message: &'static str,
    /// Label of the option that keeps recording.
    pub cancel_label: &'static str,
    /// Label of the option that stops and exits.
    pub confirm_label: &'static str,
}

/// Prompt used for every mid-session close.
pub const CLOSE_PROMPT: ClosePrompt = ClosePrompt {
    title: "Recording in Progress",
    message: "Are you sure you want to exit? Your recording will be saved.",
    cancel_label: "Cancel",
    confirm_label: "Exit",
};
