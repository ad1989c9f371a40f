//! Workout Recorder Core Library
//!
//! Recording-session state machine, elapsed-time counter and the async
//! controller that drives a camera capture capability.
//!
//! # Example
//!
//! ```no_run
//! use workout_recorder_core::{
//!     CaptureDevice, IntervalTicks, RecordingSession, SessionController, DEFAULT_TICK_PERIOD,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn record(device: Arc<dyn CaptureDevice>) -> workout_recorder_core::CoreResult<()> {
//!     let ticks = Box::new(IntervalTicks::new(DEFAULT_TICK_PERIOD));
//!     let (controller, handle, mut events) =
//!         SessionController::new(RecordingSession::default(), device, ticks);
//!     tokio::spawn(controller.run());
//!
//!     handle.start().await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     handle.stop().await?;
//!
//!     if let Some(event) = events.recv().await {
//!         println!("Session ended: {:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod session;

pub use {
    error::CaptureError,
    error::Result as CoreResult,
    error::SessionError,
    session::{
        CameraFacing, CaptureDevice, CaptureHandle, CaptureOutput, CaptureRequest, ClosePhase,
        ClosePrompt, CloseDecision, DEFAULT_TICK_PERIOD, IntervalTicks, ManualTicks,
        QualityProfile, RecordingSession, SessionController, SessionEvent, SessionHandle,
        SessionSnapshot, SessionState, TickInjector, TickSource, format_elapsed, manual_ticks,
    },
};

#[cfg(test)]
mod tests;
