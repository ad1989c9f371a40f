use crate::{
    CaptureDevice, CaptureError, CaptureHandle, CaptureOutput, CloseDecision, CoreResult,
    RecordingSession, SessionError, SessionEvent, SessionSnapshot, SessionState, TickSource,
};

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 32;

type CaptureResult = Result<CaptureOutput, CaptureError>;

/// Requests sent from a [`SessionHandle`] to the controller task.
#[derive(Debug)]
enum SessionCommand {
    Start {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    Pause {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    Resume {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    Stop {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    RequestClose {
        reply: oneshot::Sender<CloseDecision>,
    },
    ConfirmClose {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    CancelClose {
        reply: oneshot::Sender<CoreResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// A capture-device future running on its own task.
struct CaptureTask {
    capture_id: Uuid,
    join: JoinHandle<CaptureResult>,
}

/// Drives a [`RecordingSession`] on the async runtime.
///
/// Owns the session, the timer and the in-flight capture futures, and
/// processes commands, ticks and capture completions one at a time. Ticks
/// take priority over commands so that ticks queued before a command are
/// always applied first.
///
/// Runs until every [`SessionHandle`] has been dropped. A capture still
/// active at that point is ended before [`run`](Self::run) returns.
pub struct SessionController {
    session: RecordingSession,
    device: Arc<dyn CaptureDevice>,
    ticks: Box<dyn TickSource>,
    command_rx: mpsc::Receiver<SessionCommand>,
    events_tx: mpsc::Sender<SessionEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    capture_task: Option<CaptureTask>,
    stop_task: Option<CaptureTask>,
}

impl SessionController {
    /// Wires a controller to its device and timer.
    ///
    /// Returns the controller (to be driven with [`run`](Self::run)), a
    /// handle for issuing commands, and the receiver of terminal events.
    pub fn new(
        session: RecordingSession,
        device: Arc<dyn CaptureDevice>,
        ticks: Box<dyn TickSource>,
    ) -> (Self, SessionHandle, mpsc::Receiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let controller = Self {
            session,
            device,
            ticks,
            command_rx,
            events_tx,
            snapshot_tx,
            capture_task: None,
            stop_task: None,
        };
        let handle = SessionHandle {
            command_tx,
            snapshot_rx,
        };

        (controller, handle, events_rx)
    }

    /// Runs the controller event loop.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("Session controller started");

        loop {
            tokio::select! {
                biased;

                _ = self.ticks.tick(), if self.session.timer_active() => {
                    if self.session.tick() {
                        debug!(elapsed_seconds = self.session.elapsed_seconds(), "Tick");
                    }
                }

                (capture_id, outcome) = join_task(&mut self.capture_task), if self.capture_task.is_some() => {
                    self.capture_task = None;
                    let outcome = outcome.unwrap_or_else(|e| {
                        Err(CaptureError::interrupted(format!("capture task failed: {}", e)))
                    });
                    if let Some(event) = self.session.capture_ended(capture_id, outcome) {
                        self.emit(event).await;
                    }
                    self.emit_pending_exit().await;
                }

                (capture_id, outcome) = join_task(&mut self.stop_task), if self.stop_task.is_some() => {
                    self.stop_task = None;
                    let outcome = outcome.unwrap_or_else(|e| {
                        Err(CaptureError::end_rejected(format!("stop task failed: {}", e)))
                    });
                    let capture_finished = self
                        .capture_task
                        .as_ref()
                        .is_some_and(|task| task.join.is_finished());
                    if outcome.is_err() && capture_finished {
                        let (ended_id, ended) = join_task(&mut self.capture_task).await;
                        self.capture_task = None;
                        // While stopping this only keeps a finished output.
                        if let Ok(ended) = ended {
                            self.session.capture_ended(ended_id, ended);
                        }
                    }
                    if let Some(event) = self.session.stop_resolved(capture_id, outcome) {
                        // The begin future has nothing left to report once stopped.
                        if let Some(task) = self.capture_task.take() {
                            task.join.abort();
                        }
                        self.emit(event).await;
                    }
                    self.emit_pending_exit().await;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            debug!("All session handles dropped, shutting down");
                            break;
                        }
                    }
                }
            }

            self.publish();
        }

        self.shutdown().await;
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Start { reply } => {
                let result = match self.session.start() {
                    Ok(handle) => {
                        self.ticks.restart();
                        self.spawn_capture(handle);
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                reply_with(reply, result);
            }
            SessionCommand::Pause { reply } => {
                reply_with(reply, self.session.pause());
            }
            SessionCommand::Resume { reply } => {
                let result = self.session.resume();
                if result.is_ok() {
                    self.ticks.restart();
                }
                reply_with(reply, result);
            }
            SessionCommand::Stop { reply } => {
                let result = self.session.stop().map(|handle| self.spawn_stop(handle));
                reply_with(reply, result);
            }
            SessionCommand::RequestClose { reply } => {
                let decision = self.session.request_close();
                if decision == CloseDecision::ExitNow {
                    self.emit(SessionEvent::ExitRequested).await;
                }
                reply_with(reply, decision);
            }
            SessionCommand::ConfirmClose { reply } => {
                let result = self
                    .session
                    .confirm_close()
                    .map(|handle| self.spawn_stop(handle));
                reply_with(reply, result);
            }
            SessionCommand::CancelClose { reply } => {
                reply_with(reply, self.session.cancel_close());
            }
            SessionCommand::Snapshot { reply } => {
                reply_with(reply, self.session.snapshot());
            }
        }
    }

    fn spawn_capture(&mut self, handle: CaptureHandle) {
        let device = Arc::clone(&self.device);
        let request = handle.request();
        let join = tokio::spawn(async move { device.begin_capture(request).await });

        self.capture_task = Some(CaptureTask {
            capture_id: handle.capture_id(),
            join,
        });
    }

    fn spawn_stop(&mut self, handle: CaptureHandle) {
        let device = Arc::clone(&self.device);
        let capture_id = handle.capture_id();
        let join = tokio::spawn(async move { device.end_capture(capture_id).await });

        self.stop_task = Some(CaptureTask { capture_id, join });
    }

    async fn emit(&mut self, event: SessionEvent) {
        if let Err(e) = self.events_tx.send(event).await {
            debug!(event = ?e.0, "Event receiver dropped, discarding event");
        }
    }

    async fn emit_pending_exit(&mut self) {
        if self.session.take_pending_exit() {
            info!("Stop resolved, exiting as requested");
            self.emit(SessionEvent::ExitRequested).await;
        }
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    /// Ends whatever capture is still active when the last handle goes away.
    async fn shutdown(&mut self) {
        match self.session.state() {
            SessionState::Recording | SessionState::Paused => {
                if let Ok(handle) = self.session.stop() {
                    self.spawn_stop(handle);
                }
            }
            SessionState::Stopping | SessionState::Idle => {}
        }

        if self.stop_task.is_some() {
            let (capture_id, outcome) = join_task(&mut self.stop_task).await;
            self.stop_task = None;
            match outcome {
                Ok(Ok(output)) => info!(capture_id = %capture_id, uri = %output.uri, "Recording saved on shutdown"),
                Ok(Err(e)) => warn!(capture_id = %capture_id, error = %e, "Failed to stop recording on shutdown"),
                Err(e) => error!(capture_id = %capture_id, error = ?e, "Stop task panicked on shutdown"),
            }
        }

        if let Some(task) = self.capture_task.take() {
            task.join.abort();
        }

        debug!("Session controller stopped");
    }
}

/// Awaits the task in `slot`. Never resolves when the slot is empty.
async fn join_task(
    slot: &mut Option<CaptureTask>,
) -> (Uuid, Result<CaptureResult, tokio::task::JoinError>) {
    match slot {
        Some(task) => (task.capture_id, (&mut task.join).await),
        None => std::future::pending().await,
    }
}

fn reply_with<T>(reply: oneshot::Sender<T>, value: T) {
    // Caller gave up waiting; the transition has been applied regardless.
    let _ = reply.send(value);
}

/// Cloneable handle for commanding a running [`SessionController`].
///
/// Every command waits until the controller has applied it, so a
/// successful return means the transition is already visible.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Starts a new recording. Rejected unless the session is idle.
    pub async fn start(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::Start { reply }).await?
    }

    /// Freezes the counter. The capture itself keeps running.
    pub async fn pause(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::Pause { reply }).await?
    }

    /// Restarts the counter after a pause.
    pub async fn resume(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::Resume { reply }).await?
    }

    /// Requests the capture be stopped.
    ///
    /// Returns once the stop has been issued; the outcome arrives later as
    /// a [`SessionEvent`].
    pub async fn stop(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::Stop { reply }).await?
    }

    /// Asks to leave the recording screen.
    pub async fn request_close(&self) -> CoreResult<CloseDecision> {
        self.request(|reply| SessionCommand::RequestClose { reply })
            .await
    }

    /// Answers "Exit" to a pending close prompt.
    pub async fn confirm_close(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::ConfirmClose { reply })
            .await?
    }

    /// Answers "Cancel" to a pending close prompt.
    pub async fn cancel_close(&self) -> CoreResult<()> {
        self.request(|reply| SessionCommand::CancelClose { reply })
            .await?
    }

    /// Current snapshot, after all previously queued work has been applied.
    pub async fn snapshot(&self) -> CoreResult<SessionSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Receiver that observes every published snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> CoreResult<T> {
        let (reply, response) = oneshot::channel();

        self.command_tx
            .send(make(reply))
            .await
            .map_err(|_| SessionError::controller_closed())?;

        response.await.map_err(|_| SessionError::controller_closed())
    }
}
