use serde::{Deserialize, Serialize};
use workout_recorder_core::{CameraFacing, QualityProfile};

/// Capture profile requested from the camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Target resolution ("480p", "720p", "1080p", "2160p").
    #[serde(default)]
    pub quality: QualityProfile,
    /// Camera to record with ("front" or "back").
    #[serde(default)]
    pub facing: CameraFacing,
}
