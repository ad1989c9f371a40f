//! Workout Recorder: console host for the workout recording session.

mod app;
mod app_command;
mod config;
mod error;
mod input_handler;
mod simulated_camera;
mod status_indicator;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
    simulated_camera::SimulatedCamera,
    status_indicator::StatusIndicator,
};

use crate::config::{Config, DEFAULT_LOG_FILTER};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::error;
use tracing_subscriber::EnvFilter;
use workout_recorder_core::{IntervalTicks, RecordingSession, SessionController};

/// Application entry point.
fn main() {
    // Config is read before the subscriber exists so its log filter can apply.
    let config = Config::load();
    let filter = match &config {
        Ok(c) => c.logging.filter.as_str(),
        Err(_) => DEFAULT_LOG_FILTER,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let camera = Arc::new(SimulatedCamera::new(
            config.camera.output_dir.clone(),
            config.camera.max_duration(),
        ));
        let ticks = Box::new(IntervalTicks::new(config.timer.tick_period()));
        let session = RecordingSession::new(config.recording.quality, config.recording.facing);

        let (controller, session, events_rx) = SessionController::new(session, camera, ticks);
        let session_task = tokio::spawn(controller.run());

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let input_handler = InputHandler::new(command_tx);

        let app = App {
            session,
            session_task,
            events_rx,
            command_rx,
            shutdown_tx,
        };

        tokio::join!(
            async {
                if let Err(e) = input_handler.run(shutdown_rx).await {
                    error!(error = ?e, "Input handler error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // The stdin reader may still be blocked on a read.
    rt.shutdown_background();
}
