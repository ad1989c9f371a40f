#![allow(clippy::unwrap_used)]

use crate::{
    CaptureError, CaptureOutput, CloseDecision, RecordingSession, SessionController,
    SessionError, SessionEvent, SessionHandle, SessionState, TickInjector, manual_ticks,
    tests::fake_camera::FakeCamera,
};

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

struct Harness {
    handle: SessionHandle,
    events: mpsc::Receiver<SessionEvent>,
    ticks: TickInjector,
    camera: Arc<FakeCamera>,
    task: JoinHandle<()>,
}

fn spawn_controller(camera: FakeCamera) -> Harness {
    let camera = Arc::new(camera);
    let (ticks, injector) = manual_ticks();
    let (controller, handle, events) = SessionController::new(
        RecordingSession::default(),
        Arc::clone(&camera) as Arc<dyn crate::CaptureDevice>,
        Box::new(ticks),
    );
    let task = tokio::spawn(controller.run());

    Harness {
        handle,
        events,
        ticks: injector,
        camera,
        task,
    }
}

/// WHAT: Counter follows the start/pause/resume/stop walkthrough
/// WHY: Pins down the core elapsed-time contract end to end
#[tokio::test]
async fn given_recording_when_ticking_pausing_and_resuming_then_counter_matches_walkthrough() {
    // Given: A started session
    let mut h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();

    // When: 5 ticks then pause
    h.ticks.advance(5);
    h.handle.pause().await.unwrap();

    // Then: Counter frozen at 5
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Paused);
    assert_eq!(snapshot.elapsed_seconds, 5);
    assert_eq!(snapshot.display, "00:05");

    // When: Resume and 3 more ticks
    h.handle.resume().await.unwrap();
    h.ticks.advance(3);

    // Then: Counter continues from 5
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Recording);
    assert_eq!(snapshot.elapsed_seconds, 8);
    assert_eq!(snapshot.display, "00:08");

    // When: Stop
    h.handle.stop().await.unwrap();

    // Then: Completed event and Idle
    let event = h.events.recv().await.unwrap();
    assert!(matches!(event, SessionEvent::RecordingCompleted { .. }));
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);

    // When: Starting again
    h.handle.start().await.unwrap();

    // Then: Counter starts from zero
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Recording);
    assert_eq!(snapshot.elapsed_seconds, 0);
}

/// WHAT: Second start while recording is rejected
/// WHY: Only one capture may be in flight per session
#[tokio::test]
async fn given_recording_when_starting_again_then_invalid_transition() {
    // Given: A started session
    let h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();

    // When: Starting again
    let result = h.handle.start().await;

    // Then: Rejected and still recording
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            operation: "start",
            state: SessionState::Recording,
            ..
        })
    ));
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Recording);
}

/// WHAT: Ticks arriving while paused never reach the counter
/// WHY: Stopping the timer must clear any pending tick
#[tokio::test]
async fn given_paused_when_ticks_arrive_then_counter_unchanged_after_resume() {
    // Given: Recording for 2 ticks then paused
    let h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();
    h.ticks.advance(2);
    h.handle.pause().await.unwrap();

    // When: Ticks fire during the pause, then resume
    h.ticks.advance(4);
    let paused = h.handle.snapshot().await.unwrap();
    h.handle.resume().await.unwrap();
    let resumed = h.handle.snapshot().await.unwrap();

    // Then: Neither the pause nor the resume picked them up
    assert_eq!(paused.elapsed_seconds, 2);
    assert_eq!(resumed.elapsed_seconds, 2);
}

/// WHAT: Device refusing to begin returns the session to Idle
/// WHY: A failed start must not leave the timer running
#[tokio::test]
async fn given_device_rejects_begin_when_starting_then_start_failed_and_idle() {
    // Given: A camera that cannot begin capturing
    let mut h = spawn_controller(FakeCamera::rejecting_begin());

    // When: Starting
    h.handle.start().await.unwrap();
    let event = h.events.recv().await.unwrap();

    // Then: StartFailed, Idle, and further ticks do nothing
    assert!(matches!(event, SessionEvent::StartFailed { .. }));
    h.ticks.advance(3);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);
    assert_eq!(snapshot.elapsed_seconds, 0);
}

/// WHAT: Device ending the capture itself completes the session
/// WHY: Natural completion must surface the output reference
#[tokio::test]
async fn given_recording_when_device_finishes_then_recording_completed() {
    // Given: A running capture
    let mut h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();
    let request = h.camera.next_started().await;

    // When: The device finishes on its own
    let uri = FakeCamera::uri_for(request.capture_id);
    h.camera
        .finish(request.capture_id, Ok(CaptureOutput { uri: uri.clone() }));

    // Then: Completed with that output, session Idle
    let event = h.events.recv().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::RecordingCompleted {
            output: CaptureOutput { uri }
        }
    );
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);
}

/// WHAT: Abnormal termination mid-session reports RecordingFailed
/// WHY: Distinguishes capture loss from a failed start
#[tokio::test]
async fn given_paused_when_device_interrupts_then_recording_failed() {
    // Given: A paused session
    let mut h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();
    let request = h.camera.next_started().await;
    h.handle.pause().await.unwrap();

    // When: The device reports an interruption
    h.camera.finish(
        request.capture_id,
        Err(CaptureError::interrupted("storage full")),
    );

    // Then: RecordingFailed with the reason, session Idle
    let event = h.events.recv().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::RecordingFailed {
            reason: "storage full".to_string()
        }
    );
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);
}

/// WHAT: A failing stop still returns the session to Idle
/// WHY: The session cannot be left dangling in Stopping
#[tokio::test]
async fn given_device_fails_to_end_when_stopping_then_stop_failed_and_idle() {
    // Given: A recording session on a camera whose stop fails
    let mut h = spawn_controller(FakeCamera::failing_end());
    h.handle.start().await.unwrap();

    // When: Stopping
    h.handle.stop().await.unwrap();
    let event = h.events.recv().await.unwrap();

    // Then: StopFailed and Idle
    assert!(matches!(event, SessionEvent::StopFailed { .. }));
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);
    assert_eq!(h.camera.end_calls(), 1);
}

/// WHAT: Stop racing a device-side finish still reports the saved file
/// WHY: The recording exists even though there was nothing left to stop
#[tokio::test]
async fn given_device_finishes_as_stop_arrives_when_stopping_then_recording_completed() {
    // Given: A recording session on a camera that finishes as it is stopped
    let mut h = spawn_controller(FakeCamera::finishing_before_end());
    h.handle.start().await.unwrap();
    let request = h.camera.next_started().await;

    // When: Stopping
    h.handle.stop().await.unwrap();
    let event = h.events.recv().await.unwrap();

    // Then: The finished output is reported, not a stop failure
    assert_eq!(
        event,
        SessionEvent::RecordingCompleted {
            output: CaptureOutput {
                uri: FakeCamera::uri_for(request.capture_id)
            }
        }
    );
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Idle);
}

/// WHAT: Closing mid-session waits for explicit confirmation
/// WHY: Guards against silently losing a recording
#[tokio::test]
async fn given_recording_when_close_requested_then_exits_only_after_confirm() {
    // Given: A recording session
    let mut h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();

    // When: Close requested
    let decision = h.handle.request_close().await.unwrap();

    // Then: Prompt shown, no exit yet, capture untouched
    assert_eq!(decision, CloseDecision::ConfirmationRequired);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Recording);
    assert!(snapshot.close_prompt.is_some());
    assert!(h.events.try_recv().is_err());
    assert_eq!(h.camera.end_calls(), 0);

    // When: User confirms
    h.handle.confirm_close().await.unwrap();

    // Then: Recording saved, then exit
    let first = h.events.recv().await.unwrap();
    let second = h.events.recv().await.unwrap();
    assert!(matches!(first, SessionEvent::RecordingCompleted { .. }));
    assert_eq!(second, SessionEvent::ExitRequested);
}

/// WHAT: Cancelling the close prompt keeps the session recording
/// WHY: The cancel option must be side-effect free
#[tokio::test]
async fn given_close_prompt_when_cancelled_then_keeps_recording() {
    // Given: A pending close prompt
    let mut h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();
    h.handle.request_close().await.unwrap();

    // When: User cancels
    h.handle.cancel_close().await.unwrap();
    h.ticks.advance(1);

    // Then: Still recording, prompt gone, counter running
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Recording);
    assert!(snapshot.close_prompt.is_none());
    assert_eq!(snapshot.elapsed_seconds, 1);
    assert!(h.events.try_recv().is_err());
}

/// WHAT: Closing while idle exits immediately
/// WHY: Nothing to lose, so no confirmation is needed
#[tokio::test]
async fn given_idle_when_close_requested_then_exit_now() {
    // Given: An idle session
    let mut h = spawn_controller(FakeCamera::new());

    // When: Close requested
    let decision = h.handle.request_close().await.unwrap();

    // Then: Exit signalled straight away
    assert_eq!(decision, CloseDecision::ExitNow);
    assert_eq!(h.events.recv().await.unwrap(), SessionEvent::ExitRequested);
}

/// WHAT: Snapshot subscribers observe state changes
/// WHY: The UI renders from the published snapshots
#[tokio::test]
async fn given_subscriber_when_recording_starts_then_snapshot_published() {
    // Given: A subscriber on an idle session
    let h = spawn_controller(FakeCamera::new());
    let mut rx = h.handle.subscribe();
    assert_eq!(rx.borrow().state, SessionState::Idle);

    // When: Starting
    h.handle.start().await.unwrap();
    rx.changed().await.unwrap();

    // Then: Recording observed
    assert_eq!(rx.borrow_and_update().state, SessionState::Recording);
}

/// WHAT: Dropping every handle ends the active capture
/// WHY: Leaving the screen must not leave the camera recording
#[tokio::test]
async fn given_recording_when_all_handles_dropped_then_capture_ended() {
    // Given: A recording session
    let h = spawn_controller(FakeCamera::new());
    h.handle.start().await.unwrap();
    h.camera.next_started().await;

    // When: The last handle is dropped
    let Harness {
        handle,
        camera,
        task,
        ..
    } = h;
    drop(handle);
    task.await.unwrap();

    // Then: The device was told to stop
    assert_eq!(camera.end_calls(), 1);
}

/// WHAT: Commands after the controller exits report ControllerClosed
/// WHY: Callers get an error rather than hanging forever
#[tokio::test]
async fn given_stopped_controller_when_sending_command_then_controller_closed() {
    // Given: A controller task that has been aborted
    let h = spawn_controller(FakeCamera::new());
    h.task.abort();
    let _ = h.task.await;

    // When: Sending a command
    let result = h.handle.start().await;

    // Then: ControllerClosed
    assert!(matches!(result, Err(SessionError::ControllerClosed { .. })));
}
