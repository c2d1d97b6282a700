//! Tracing setup. The terminal belongs to the TUI, so logs go to a file.
//!
use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber appending to `path`. `RUST_LOG` wins over `default_level`.
pub fn init(path: &Path, default_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log level: {default_level}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}
