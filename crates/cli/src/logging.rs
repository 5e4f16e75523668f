//! File-backed log stream.
//!
//! Diagnostics go to a timestamped, human-readable log file so the console
//! stays free for the progress bar.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gallery_core::{AppConfig, Task};

/// Route `tracing` output to `log_file`, appending. Level comes from
/// `RUST_LOG`, defaulting to `info`.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

/// Delete `path`, treating an already-absent file as success.
pub fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Delete the URL list and log file when a crawl asks for a clean start.
///
/// Runs before [`init`] so the new log starts empty. Returns whether anything
/// was attempted; other tasks never touch these files.
pub fn clean_start(config: &AppConfig, task: Task) -> Result<bool> {
    if !config.clean || task != Task::Crawl {
        return Ok(false);
    }
    for path in [&config.urls_file, &config.log_file] {
        remove_if_exists(path).with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(true)
}
