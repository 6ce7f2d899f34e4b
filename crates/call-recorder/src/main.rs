//! Call-Recorder: records phone calls driven by call-state signals.

mod app;
mod app_command;
mod config;
mod error;
mod keep_alive;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    keep_alive::StatusKeepAlive,
};

use crate::config::Config;

use call_recorder_core::{CallRecorder, CpalCaptureBackend, SessionManager};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("call_recorder=debug,call_recorder_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let recordings_dir = match config.recordings_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve recordings directory: {:?}", e);
            std::process::exit(1);
        }
    };

    info!(
        recordings_dir = ?recordings_dir,
        format = ?config.recordings.format,
        "Recorder configured"
    );

    let backend = CpalCaptureBackend::new(config.capture.call_audio_device.clone());
    let sessions = SessionManager::new(Box::new(backend), recordings_dir)
        .with_contacts(Box::new(config.contacts.clone()))
        .with_keep_alive(Box::new(StatusKeepAlive::new()))
        .with_format(config.recordings.format);

    let app = App {
        recorder: CallRecorder::new(sessions),
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(app.run(tokio::io::stdin())) {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}
