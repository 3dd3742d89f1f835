//! Tracing subscriber setup
//!
//! Log output goes to a file so it never tears the dashboard. The filter
//! comes from `RUST_LOG` when set, otherwise from the `-v` count.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_NAME: &str = "sudman.log";

/// `<state dir>/sudman/sudman.log`, falling back to the cache dir
pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("sudman").join(LOG_FILE_NAME))
}

pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn build_subscriber(log_file: File, verbosity: u8) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(verbosity).into()));

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

/// Install the global subscriber. Returns the log path on success.
///
/// Logging is best effort: an unwritable path leaves tracing disabled.
pub fn init(log_file: Option<&Path>, verbosity: u8) -> Option<PathBuf> {
    let path = log_file.map(Path::to_path_buf).or_else(default_log_path)?;
    let file = open_log(&path)?;
    build_subscriber(file, verbosity).try_init().ok()?;
    Some(path)
}
