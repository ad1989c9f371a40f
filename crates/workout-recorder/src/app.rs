use crate::{AppCommand, AppResult, StatusIndicator};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{error, info, instrument, warn};
use workout_recorder_core::{
    CloseDecision, SessionError, SessionEvent, SessionHandle, SessionSnapshot, SessionState,
};

/// Main application state.
///
/// Owns the handle to the recording session and turns console commands
/// into session operations. Renders the status indicator whenever the
/// session publishes a new snapshot.
pub struct App {
    pub(crate) session: SessionHandle,
    pub(crate) session_task: JoinHandle<()>,
    pub(crate) events_rx: mpsc::Receiver<SessionEvent>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Workout Recorder starting");

        let mut snapshot_rx = self.session.subscribe();
        let mut indicator = StatusIndicator::from(&*snapshot_rx.borrow_and_update());
        print_status(&indicator);
        let mut prompt_visible = false;

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => {
                    if self.handle_event(event) {
                        info!("Exit requested by session");
                        break;
                    }
                }

                Ok(()) = snapshot_rx.changed() => {
                    let snapshot = snapshot_rx.borrow_and_update().clone();
                    let next = StatusIndicator::from(&snapshot);
                    if next != indicator {
                        indicator = next;
                        print_status(&indicator);
                    }
                    let visible = snapshot.close_prompt.is_some();
                    if visible && !prompt_visible {
                        print_prompt(&snapshot);
                    }
                    prompt_visible = visible;
                }

                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Quit {
                        info!("Quit requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd).await {
                        warn!(command = ?cmd, error = %e, "Command rejected");
                        println!("Cannot {:?} right now", cmd);
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        let _ = self.shutdown_tx.send(true);

        // Dropping the last handle lets the controller end any active capture.
        let App {
            session,
            session_task,
            mut events_rx,
            ..
        } = self;
        drop(session);

        if let Err(e) = session_task.await {
            error!(error = ?e, "Session controller task panicked");
        }
        while let Ok(event) = events_rx.try_recv() {
            info!(event = ?event, "Discarding event after shutdown");
        }

        info!("Workout Recorder shut down successfully");

        Ok(())
    }

    /// Apply a console command to the session.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Start => self.session.start().await?,
            AppCommand::Pause => self.session.pause().await?,
            AppCommand::Resume => self.session.resume().await?,
            AppCommand::Finish => match self.session.stop().await {
                // Nothing recording: finishing leaves the screen.
                Err(SessionError::InvalidTransition {
                    state: SessionState::Idle,
                    ..
                }) => {
                    self.session.request_close().await?;
                }
                result => result?,
            },
            AppCommand::Close => match self.session.request_close().await? {
                CloseDecision::ExitNow | CloseDecision::ConfirmationRequired => {}
                CloseDecision::ExitAfterStop => println!("Exiting once the recording is saved"),
            },
            AppCommand::ConfirmClose => self.session.confirm_close().await?,
            AppCommand::CancelClose => self.session.cancel_close().await?,
            AppCommand::Status => {
                let snapshot = self.session.snapshot().await?;
                print_status(&StatusIndicator::from(&snapshot));
            }
            AppCommand::Quit => {}
        }

        Ok(())
    }

    /// Report a terminal session event. Returns true when the app should exit.
    pub(crate) fn handle_event(&self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::RecordingCompleted { output } => {
                info!(uri = %output.uri, "Recording saved");
                println!("Recording saved: {}", output.uri);
                false
            }
            SessionEvent::StartFailed { reason } => {
                error!(reason = %reason, "Failed to start recording");
                println!("Error: Failed to start recording ({})", reason);
                false
            }
            SessionEvent::RecordingFailed { reason } => {
                error!(reason = %reason, "Recording failed");
                println!("Error: Failed to record video ({})", reason);
                false
            }
            SessionEvent::StopFailed { reason } => {
                error!(reason = %reason, "Failed to stop recording");
                println!("Error: Failed to stop recording ({})", reason);
                false
            }
            SessionEvent::ExitRequested => true,
        }
    }
}

fn print_status(indicator: &StatusIndicator) {
    println!("[{}]  {}", indicator, indicator.controls());
}

fn print_prompt(snapshot: &SessionSnapshot) {
    if let Some(prompt) = snapshot.close_prompt {
        println!(
            "{}: {} [{} -> 'cancel' | {} -> 'confirm']",
            prompt.title, prompt.message, prompt.cancel_label, prompt.confirm_label
        );
    }
}
