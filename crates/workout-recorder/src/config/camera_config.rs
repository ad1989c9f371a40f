use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Simulated camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Directory recordings are written to.
    pub output_dir: PathBuf,

    /// End each capture on the device side after this many seconds.
    #[serde(default)]
    pub max_duration_secs: Option<u64>,
}

impl CameraConfig {
    /// Device-side capture limit, if any.
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs.map(Duration::from_secs)
    }
}
