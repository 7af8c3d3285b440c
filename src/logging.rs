use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;

use crate::config;

/// Environment variable selecting the log level (`error` .. `trace`).
pub const LEVEL_ENV: &str = "TODOLIST_LOG";

/// Install a file-backed `tracing` subscriber at ~/.todolist/todolist.log.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
pub fn init() -> Result<()> {
    let path = config::log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn parse_level(value: &str) -> Option<Level> {
    value.trim().parse().ok()
}
