//! Tracing setup: console plus an append-only log file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::log_rotation::{rotate_if_needed, MAX_LOG_BYTES, MAX_ROTATED_FILES};

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. The file layer
/// never writes ANSI escapes. Failing to open `log_file` is fatal; failing
/// to rotate it only warns.
pub fn init(log_file: &Path, console: bool) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let rotation = rotate_if_needed(log_file, MAX_LOG_BYTES, MAX_ROTATED_FILES);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = console.then(|| fmt::layer().with_target(false));
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    match rotation {
        Ok(true) => tracing::info!(path = %log_file.display(), "log file rotated"),
        Ok(false) => {}
        Err(err) => tracing::warn!(path = %log_file.display(), error = %err, "log rotation failed"),
    }
    Ok(())
}
