//! Tracing setup: one layer for the terminal, one for the run's log file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("archdesk-{}.log", started.format("%Y%m%d-%H%M%S"))
}

/// Create the log file inside `dir`, creating the directory if needed.
pub fn create_log_file(dir: &Path, started: DateTime<Local>) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;
    let path = dir.join(log_file_name(started));
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file {:?}", path))?;
    Ok((path, file))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. Without a `log_dir`, or
/// when the log file cannot be created, output goes to the terminal only.
pub fn init(log_dir: Option<&Path>) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let terminal = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (path, file_layer, file_error) = match log_dir.map(|dir| create_log_file(dir, Local::now())) {
        None => (None, None, None),
        Some(Ok((path, file))) => {
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false);
            (Some(path), Some(layer), None)
        }
        Some(Err(e)) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal)
        .with(file_layer)
        .init();

    match (&path, file_error) {
        (Some(path), _) => tracing::info!("Logging to {}", path.display()),
        (None, Some(e)) => tracing::warn!("File logging disabled: {:#}", e),
        (None, None) => {}
    }
    path
}
