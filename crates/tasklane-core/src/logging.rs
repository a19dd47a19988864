//! Log file setup.
//!
//! The TUI owns stdout/stderr while it runs, so diagnostics always go to
//! `<TASKLANE_HOME>/logs/tasklane.log`. The filter comes from `TASKLANE_LOG`
//! when set, otherwise from `log_level` in the config.

use std::fs;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "TASKLANE_LOG";

/// File name inside the logs directory.
pub const LOG_FILE_NAME: &str = "tasklane.log";

/// Installs the global subscriber writing to the log file.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// whole process.
///
/// # Errors
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_file_logging(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log_level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

/// Builds the filter, preferring `TASKLANE_LOG` over the configured level.
///
/// An unparsable directive falls back to `info` rather than failing startup.
fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
