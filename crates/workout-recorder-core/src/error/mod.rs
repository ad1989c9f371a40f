use crate::SessionState;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation is not valid in the session's current state.
    #[error("Cannot {operation} while {state} {location}")]
    InvalidTransition {
        /// Name of the rejected operation.
        operation: &'static str,
        /// State the session was in when the operation was attempted.
        state: SessionState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The session controller task has shut down.
    #[error("Session controller is no longer running {location}")]
    ControllerClosed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    #[track_caller]
    pub(crate) fn invalid_transition(operation: &'static str, state: SessionState) -> Self {
        SessionError::InvalidTransition {
            operation,
            state,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn controller_closed() -> Self {
        SessionError::ControllerClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Failures reported by a [`CaptureDevice`](crate::CaptureDevice).
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The device could not begin capturing.
    #[error("Capture could not begin: {reason} {location}")]
    BeginRejected {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture terminated abnormally after it had begun.
    #[error("Capture interrupted: {reason} {location}")]
    Interrupted {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An explicit stop request did not complete cleanly.
    #[error("Capture did not stop cleanly: {reason} {location}")]
    EndRejected {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CaptureError {
    /// Device could not begin capturing.
    #[track_caller]
    pub fn begin_rejected(reason: impl Into<String>) -> Self {
        CaptureError::BeginRejected {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Capture ended abnormally mid-session.
    #[track_caller]
    pub fn interrupted(reason: impl Into<String>) -> Self {
        CaptureError::Interrupted {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Explicit stop did not complete.
    #[track_caller]
    pub fn end_rejected(reason: impl Into<String>) -> Self {
        CaptureError::EndRejected {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Human-readable reason without the location suffix.
    pub fn reason(&self) -> &str {
        match self {
            CaptureError::BeginRejected { reason, .. }
            | CaptureError::Interrupted { reason, .. }
            | CaptureError::EndRejected { reason, .. } => reason,
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
