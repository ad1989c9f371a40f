//! Console input handler.
//!
//! Reads commands from stdin and forwards them to the main application.
//! Stands in for the recording screen's buttons.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Turns console lines into [`AppCommand`]s.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Create a handler that forwards commands to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the input loop until shutdown or end of input.
    ///
    /// End of input is treated as [`AppCommand::Quit`].
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task that forwards stdin lines.
        //
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    match line {
                        Some(line) => self.handle_line(&line).await?,
                        None => {
                            info!("End of input");
                            self.send(AppCommand::Quit).await?;
                            break;
                        }
                    }
                }
            }
        }

        drop(line_rx);

        // Best-effort join: the blocking task may be stuck in a read if no
        // further line arrives after shutdown. It is cleaned up on exit.
        match tokio::time::timeout(Duration::from_millis(100), handle).await {
            Ok(Ok(())) => debug!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!("Input forwarder still blocked on stdin, will be cleaned up on exit"),
        }

        Ok(())
    }

    /// Parse and forward one line. Unknown input is reported, not fatal.
    pub(crate) async fn handle_line(&self, line: &str) -> AppResult<()> {
        match AppCommand::parse(line) {
            Ok(Some(command)) => self.send(command).await,
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Ignoring input");
                println!(
                    "Unknown command {:?}. Try: start, pause, resume, finish, close, confirm, cancel, status, quit",
                    line.trim()
                );
                Ok(())
            }
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
