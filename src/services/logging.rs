//! tracing subscriber setup
//!
//! Filter comes from `ORDERDASH_LOG` (EnvFilter syntax), default `warn`.
//! CLI commands log to stderr; the TUI logs to a daily-rotated file so the
//! alternate screen is never written over.

use std::path::Path;
use std::sync::Mutex;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::types::{OrderdashError, Result};

pub const LOG_ENV: &str = "ORDERDASH_LOG";

/// Log file prefix; rotated files are named `orderdash.YYYY-MM-DD.log`
pub const LOG_PREFIX: &str = "orderdash";

/// Rotated log files kept in the log directory
const MAX_LOG_FILES: usize = 7;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Daily-rotated appender writing into `dir`
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| OrderdashError::Io(std::io::Error::other(e)))
}

/// Log to stderr (CLI commands)
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a daily file under `dir` (TUI)
pub fn init_file(dir: &Path) -> Result<()> {
    let appender = file_appender(dir)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(appender))
        .with_ansi(false)
        .try_init();
    Ok(())
}
