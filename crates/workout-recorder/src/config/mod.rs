mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod recording_config;
mod timer_config;

pub(crate) use {
    camera_config::CameraConfig, config::Config, logging_config::LoggingConfig,
    recording_config::RecordingConfig, timer_config::TimerConfig,
};

pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub(crate) const DEFAULT_LOG_FILTER: &str = "workout_recorder=info,workout_recorder_core=info";

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
