use crate::{
    CameraFacing, CaptureError, CaptureHandle, CaptureOutput, ClosePhase, CloseDecision,
    CoreResult, QualityProfile, SessionError, SessionEvent, SessionSnapshot, SessionState,
    session::{CLOSE_PROMPT, format_elapsed},
};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Record/pause/resume/stop state machine for one workout recording.
///
/// Pure state: performs no I/O and owns no timer. The caller is expected to
/// run a timer only while [`timer_active`](Self::timer_active) is true, feed
/// each period into [`tick`](Self::tick), and report capture completions back
/// through [`capture_ended`](Self::capture_ended) and
/// [`stop_resolved`](Self::stop_resolved). [`SessionController`](crate::SessionController)
/// does exactly this on an async runtime.
///
/// # Invariants
///
/// - The counter only advances in [`SessionState::Recording`].
/// - A capture handle is held iff the state is not [`SessionState::Idle`].
/// - Every failure path lands in [`SessionState::Idle`].
#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    elapsed_seconds: u64,
    handle: Option<CaptureHandle>,
    close_phase: ClosePhase,
    saved_output: Option<CaptureOutput>,
    quality: QualityProfile,
    facing: CameraFacing,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(QualityProfile::default(), CameraFacing::default())
    }
}

impl RecordingSession {
    /// Creates an idle session that will capture with the given profile.
    pub fn new(quality: QualityProfile, facing: CameraFacing) -> Self {
        Self {
            state: SessionState::Idle,
            elapsed_seconds: 0,
            handle: None,
            close_phase: ClosePhase::None,
            saved_output: None,
            quality,
            facing,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seconds counted while recording.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Counter formatted as `MM:SS` (or `HH:MM:SS`).
    pub fn display_time(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    /// Handle of the in-flight capture, if any.
    pub fn handle(&self) -> Option<&CaptureHandle> {
        self.handle.as_ref()
    }

    /// Whether exactly one timer should be running.
    pub fn timer_active(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Progress of any close request.
    pub fn close_phase(&self) -> ClosePhase {
        self.close_phase
    }

    /// Observable view for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            elapsed_seconds: self.elapsed_seconds,
            display: self.display_time(),
            close_prompt: (self.close_phase == ClosePhase::AwaitingConfirmation)
                .then_some(CLOSE_PROMPT),
        }
    }

    /// Idle -> Recording.
    ///
    /// Resets the counter and returns the handle the caller must pass to the
    /// capture device. A second `start` before the session returns to idle is
    /// rejected.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<CaptureHandle> {
        if self.state != SessionState::Idle {
            return Err(SessionError::invalid_transition("start", self.state));
        }

        let handle = CaptureHandle::new(self.quality, self.facing);
        self.elapsed_seconds = 0;
        self.handle = Some(handle);
        self.close_phase = ClosePhase::None;
        self.saved_output = None;
        self.state = SessionState::Recording;

        info!(
            capture_id = %handle.capture_id(),
            quality = %self.quality,
            facing = ?self.facing,
            "Recording started"
        );

        Ok(handle)
    }

    /// Recording -> Paused.
    ///
    /// Only the counter is frozen. The camera has no pause primitive, so the
    /// capture keeps running and the paused span still ends up in the output
    /// file; the displayed time then under-reports the recorded length.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        if self.state != SessionState::Recording {
            return Err(SessionError::invalid_transition("pause", self.state));
        }

        self.state = SessionState::Paused;
        info!(elapsed_seconds = self.elapsed_seconds, "Recording paused");

        Ok(())
    }

    /// Paused -> Recording, keeping the counter.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        if self.state != SessionState::Paused {
            return Err(SessionError::invalid_transition("resume", self.state));
        }

        self.state = SessionState::Recording;
        info!(elapsed_seconds = self.elapsed_seconds, "Recording resumed");

        Ok(())
    }

    /// Recording | Paused -> Stopping.
    ///
    /// Returns the handle whose capture must now be ended. The session stays
    /// in [`SessionState::Stopping`] until [`stop_resolved`](Self::stop_resolved).
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<CaptureHandle> {
        let handle = match (self.state, self.handle) {
            (SessionState::Recording | SessionState::Paused, Some(handle)) => handle,
            _ => return Err(SessionError::invalid_transition("stop", self.state)),
        };

        self.state = SessionState::Stopping;
        if self.close_phase == ClosePhase::AwaitingConfirmation {
            self.close_phase = ClosePhase::None;
        }

        info!(
            capture_id = %handle.capture_id(),
            elapsed_seconds = self.elapsed_seconds,
            "Stopping recording"
        );

        Ok(handle)
    }

    /// Applies one timer period. Returns whether the counter advanced.
    pub fn tick(&mut self) -> bool {
        if self.state != SessionState::Recording {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }

    /// The device finished a capture without being asked to stop.
    ///
    /// Completions for stale captures are ignored. While a stop is already in
    /// flight the stop outcome decides the session, but a successful output
    /// is kept in case the device no longer has a capture to stop.
    #[instrument(skip(self, outcome))]
    pub fn capture_ended(
        &mut self,
        capture_id: Uuid,
        outcome: Result<CaptureOutput, CaptureError>,
    ) -> Option<SessionEvent> {
        if !self.owns_capture(capture_id) {
            debug!(capture_id = %capture_id, "Ignoring completion of stale capture");
            return None;
        }

        if self.state == SessionState::Stopping {
            debug!(capture_id = %capture_id, "Capture ended during stop");
            if let Ok(output) = outcome {
                self.saved_output = Some(output);
            }
            return None;
        }

        let event = match outcome {
            Ok(output) => {
                info!(capture_id = %capture_id, uri = %output.uri, "Recording saved");
                SessionEvent::RecordingCompleted { output }
            }
            Err(CaptureError::BeginRejected { reason, .. }) => {
                warn!(capture_id = %capture_id, reason = %reason, "Failed to start recording");
                SessionEvent::StartFailed { reason }
            }
            Err(e) => {
                warn!(capture_id = %capture_id, error = %e, "Recording failed");
                SessionEvent::RecordingFailed {
                    reason: e.reason().to_string(),
                }
            }
        };

        // Nothing left to confirm once the capture is gone.
        if self.close_phase == ClosePhase::AwaitingConfirmation {
            self.close_phase = ClosePhase::None;
        }
        self.enter_idle();

        Some(event)
    }

    /// The explicit stop requested by [`stop`](Self::stop) has resolved.
    ///
    /// Always returns the session to idle, whatever the outcome. A failed stop
    /// still completes the recording when the capture had already finished
    /// with an output.
    #[instrument(skip(self, outcome))]
    pub fn stop_resolved(
        &mut self,
        capture_id: Uuid,
        outcome: Result<CaptureOutput, CaptureError>,
    ) -> Option<SessionEvent> {
        if self.state != SessionState::Stopping || !self.owns_capture(capture_id) {
            debug!(capture_id = %capture_id, state = ?self.state, "Ignoring stale stop result");
            return None;
        }

        let recorded_for = self.handle.map(|handle| handle.requested_at().elapsed());

        let event = match (outcome, self.saved_output.take()) {
            (Ok(output), _) => {
                info!(
                    capture_id = %capture_id,
                    uri = %output.uri,
                    recorded_for = ?recorded_for,
                    "Recording saved"
                );
                SessionEvent::RecordingCompleted { output }
            }
            (Err(e), Some(output)) => {
                debug!(
                    capture_id = %capture_id,
                    error = %e,
                    "Stop found capture already finished"
                );
                info!(
                    capture_id = %capture_id,
                    uri = %output.uri,
                    recorded_for = ?recorded_for,
                    "Recording saved"
                );
                SessionEvent::RecordingCompleted { output }
            }
            (Err(e), None) => {
                warn!(capture_id = %capture_id, error = %e, "Failed to stop recording");
                SessionEvent::StopFailed {
                    reason: e.reason().to_string(),
                }
            }
        };

        self.enter_idle();

        Some(event)
    }

    /// User asked to leave the recording screen.
    #[instrument(skip(self))]
    pub fn request_close(&mut self) -> CloseDecision {
        match self.state {
            SessionState::Idle => CloseDecision::ExitNow,
            SessionState::Recording | SessionState::Paused => {
                self.close_phase = ClosePhase::AwaitingConfirmation;
                debug!("Close requested mid-session, awaiting confirmation");
                CloseDecision::ConfirmationRequired
            }
            SessionState::Stopping => {
                self.close_phase = ClosePhase::ExitAfterStop;
                CloseDecision::ExitAfterStop
            }
        }
    }

    /// User confirmed the close prompt: stop, then exit once stopped.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn confirm_close(&mut self) -> CoreResult<CaptureHandle> {
        if self.close_phase != ClosePhase::AwaitingConfirmation {
            return Err(SessionError::invalid_transition("confirm close", self.state));
        }

        let handle = self.stop()?;
        self.close_phase = ClosePhase::ExitAfterStop;

        Ok(handle)
    }

    /// User dismissed the close prompt and keeps recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn cancel_close(&mut self) -> CoreResult<()> {
        if self.close_phase != ClosePhase::AwaitingConfirmation {
            return Err(SessionError::invalid_transition("cancel close", self.state));
        }

        self.close_phase = ClosePhase::None;
        debug!("Close cancelled");

        Ok(())
    }

    /// Consumes a deferred exit once the session is back to idle.
    pub fn take_pending_exit(&mut self) -> bool {
        if self.state == SessionState::Idle && self.close_phase == ClosePhase::ExitAfterStop {
            self.close_phase = ClosePhase::None;
            return true;
        }
        false
    }

    fn owns_capture(&self, capture_id: Uuid) -> bool {
        self.handle
            .is_some_and(|handle| handle.capture_id() == capture_id)
    }

    fn enter_idle(&mut self) {
        self.state = SessionState::Idle;
        self.handle = None;
        self.saved_output = None;
        self.elapsed_seconds = 0;
    }
}
