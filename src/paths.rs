//! XDG-compliant application paths

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_NAME: &str = "lectern";

/// Compute the log file path. Uses `state_dir` on platforms that have it,
/// falls back to `cache_dir`.
pub fn resolve_log_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .context("Could not determine state or cache directory")?;

    let log_dir = base.join(APP_NAME);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {log_dir:?}"))?;

    Ok(log_dir.join("lectern.log"))
}
