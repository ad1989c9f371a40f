use crate::CaptureError;

use std::{fmt, time::Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target resolution requested from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityProfile {
    /// 640x480.
    #[serde(rename = "480p")]
    P480,
    /// 1280x720.
    #[default]
    #[serde(rename = "720p")]
    P720,
    /// 1920x1080.
    #[serde(rename = "1080p")]
    P1080,
    /// 3840x2160.
    #[serde(rename = "2160p")]
    P2160,
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityProfile::P480 => "480p",
            QualityProfile::P720 => "720p",
            QualityProfile::P1080 => "1080p",
            QualityProfile::P2160 => "2160p",
        };
        f.write_str(label)
    }
}

/// Which camera the capture uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// User-facing camera, so the athlete can see themselves.
    #[default]
    Front,
    /// Rear camera.
    Back,
}

/// Parameters for a single capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Identifies this capture in later [`CaptureDevice::end_capture`] calls.
    pub capture_id: Uuid,
    /// Requested resolution.
    pub quality: QualityProfile,
    /// Requested camera.
    pub facing: CameraFacing,
}

/// Reference to a finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutput {
    /// Location of the recorded file as reported by the device.
    pub uri: String,
}

/// Opaque reference to the in-flight capture held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHandle {
    capture_id: Uuid,
    requested_at: Instant,
    request: CaptureRequest,
}

impl CaptureHandle {
    pub(crate) fn new(quality: QualityProfile, facing: CameraFacing) -> Self {
        let capture_id = Uuid::new_v4();
        Self {
            capture_id,
            requested_at: Instant::now(),
            request: CaptureRequest {
                capture_id,
                quality,
                facing,
            },
        }
    }

    /// Unique id of the capture.
    pub fn capture_id(&self) -> Uuid {
        self.capture_id
    }

    /// When the capture was requested.
    ///
    /// Unlike the session counter this keeps running through pauses.
    pub fn requested_at(&self) -> Instant {
        self.requested_at
    }

    /// Request sent to the device for this capture.
    pub fn request(&self) -> CaptureRequest {
        self.request
    }
}

/// Camera capability the session drives.
///
/// Permission to use the camera is the host's concern; implementations are
/// only invoked once access has been granted.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Begins capturing.
    ///
    /// The returned future resolves when the capture ends, either because
    /// [`end_capture`](Self::end_capture) was called or because the device
    /// ended it on its own. It does not resolve on pause.
    async fn begin_capture(&self, request: CaptureRequest) -> Result<CaptureOutput, CaptureError>;

    /// Asks the device to stop the capture identified by `capture_id`.
    async fn end_capture(&self, capture_id: Uuid) -> Result<CaptureOutput, CaptureError>;
}
