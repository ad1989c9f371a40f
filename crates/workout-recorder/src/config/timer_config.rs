use crate::config::default_tick_interval_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed-time counter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Milliseconds per counter increment.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl TimerConfig {
    /// Tick period as a `Duration`.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}
