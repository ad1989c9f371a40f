use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording.
    Start,
    /// Freeze the counter.
    Pause,
    /// Restart the counter after a pause.
    Resume,
    /// Stop and save the recording.
    Finish,
    /// Ask to leave the recording screen.
    Close,
    /// Answer "Exit" to the close prompt.
    ConfirmClose,
    /// Answer "Cancel" to the close prompt.
    CancelClose,
    /// Print the current status.
    Status,
    /// Request application shutdown.
    Quit,
}

impl AppCommand {
    /// Parse one line of console input. Blank lines yield `None`.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let input = line.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let command = match input.to_ascii_lowercase().as_str() {
            "start" | "record" => AppCommand::Start,
            "pause" => AppCommand::Pause,
            "resume" => AppCommand::Resume,
            "finish" | "stop" => AppCommand::Finish,
            "close" => AppCommand::Close,
            "confirm" | "exit" => AppCommand::ConfirmClose,
            "cancel" => AppCommand::CancelClose,
            "status" => AppCommand::Status,
            "quit" | "q" => AppCommand::Quit,
            _ => {
                return Err(AppError::UnknownCommand {
                    input: input.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(Some(command))
    }
}
