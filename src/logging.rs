//! Tracing setup. The console owns the terminal, so logs go to a file.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter (default `info`)
pub const LOG_ENV: &str = "MAILADMIN_LOG";
pub const LOG_FILE: &str = "mailadmin.log";

pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("mailadmin"))
        .unwrap_or_else(std::env::temp_dir)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to `<dir>/mailadmin.log`. Keep the guard alive until exit so buffered
/// lines are flushed. Returns `None` if logging could not be set up.
pub fn init_file_tracing(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Log to stderr, for the command line helpers
pub fn init_stderr_tracing() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
