use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;
use workout_recorder_core::{CaptureDevice, CaptureError, CaptureOutput, CaptureRequest};

struct ActiveCapture {
    request: CaptureRequest,
    started_at: Instant,
    stop_tx: oneshot::Sender<()>,
}

/// Stand-in for the device camera.
///
/// Writes a small placeholder file per capture describing what would have
/// been recorded. Optionally ends captures on its own after a fixed
/// duration, the way a device hits its recording limit.
pub struct SimulatedCamera {
    output_dir: PathBuf,
    max_duration: Option<Duration>,
    active: Mutex<HashMap<Uuid, ActiveCapture>>,
}

impl SimulatedCamera {
    /// Create a camera writing into `output_dir`.
    pub fn new(output_dir: PathBuf, max_duration: Option<Duration>) -> Self {
        Self {
            output_dir,
            max_duration,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Path the capture with `capture_id` is written to.
    pub fn output_path(&self, capture_id: Uuid) -> PathBuf {
        self.output_dir.join(format!("workout-{}.mp4", capture_id))
    }

    fn active(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ActiveCapture>> {
        // Map entries stay valid even if a holder panicked.
        self.active.lock().unwrap_or_else(|e| {
            error!("Active capture lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn output(path: &Path) -> CaptureOutput {
        CaptureOutput {
            uri: path.display().to_string(),
        }
    }

    fn write_placeholder(&self, capture: &ActiveCapture) -> std::io::Result<PathBuf> {
        let path = self.output_path(capture.request.capture_id);
        let contents = format!(
            "capture_id = \"{}\"\nquality = \"{}\"\nfacing = \"{:?}\"\nduration_ms = {}\n",
            capture.request.capture_id,
            capture.request.quality,
            capture.request.facing,
            capture.started_at.elapsed().as_millis(),
        );
        fs::write(&path, contents)?;
        Ok(path)
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    #[instrument(skip(self))]
    async fn begin_capture(&self, request: CaptureRequest) -> Result<CaptureOutput, CaptureError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            CaptureError::begin_rejected(format!(
                "Failed to create output directory {:?}: {}",
                self.output_dir, e
            ))
        })?;

        let capture_id = request.capture_id;
        let (stop_tx, stop_rx) = oneshot::channel();
        self.active().insert(
            capture_id,
            ActiveCapture {
                request,
                started_at: Instant::now(),
                stop_tx,
            },
        );

        info!(capture_id = %capture_id, quality = %request.quality, "Simulated capture started");

        let limit = async {
            match self.max_duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = stop_rx => {
                debug!(capture_id = %capture_id, "Capture ended by stop request");
                Ok(Self::output(&self.output_path(capture_id)))
            }
            _ = limit => {
                let removed = self.active().remove(&capture_id);
                let Some(capture) = removed else {
                    // Stop raced the limit and already finalized the file.
                    return Ok(Self::output(&self.output_path(capture_id)));
                };
                info!(capture_id = %capture_id, "Capture reached its maximum duration");
                self.write_placeholder(&capture)
                    .map(|path| Self::output(&path))
                    .map_err(|e| CaptureError::interrupted(format!("Failed to write recording: {}", e)))
            }
        }
    }

    #[instrument(skip(self))]
    async fn end_capture(&self, capture_id: Uuid) -> Result<CaptureOutput, CaptureError> {
        let capture = self.active().remove(&capture_id).ok_or_else(|| {
            CaptureError::end_rejected(format!("No active capture {}", capture_id))
        })?;

        let result = self
            .write_placeholder(&capture)
            .map(|path| Self::output(&path))
            .map_err(|e| CaptureError::end_rejected(format!("Failed to write recording: {}", e)));

        // Begin side may already be gone if the controller dropped it.
        let _ = capture.stop_tx.send(());

        if let Ok(output) = &result {
            info!(capture_id = %capture_id, uri = %output.uri, "Simulated capture stopped");
        }

        result
    }
}
