mod capture;
mod close;
mod controller;
mod event;
mod format;
mod recording_session;
mod state;
mod timer;

pub(crate) use close::CLOSE_PROMPT;

pub use {
    capture::{
        CameraFacing, CaptureDevice, CaptureHandle, CaptureOutput, CaptureRequest, QualityProfile,
    },
    close::{ClosePhase, ClosePrompt, CloseDecision},
    controller::{SessionController, SessionHandle},
    event::{SessionEvent, SessionSnapshot},
    format::format_elapsed,
    recording_session::RecordingSession,
    state::SessionState,
    timer::{
        DEFAULT_TICK_PERIOD, IntervalTicks, ManualTicks, TickInjector, TickSource, manual_ticks,
    },
};
