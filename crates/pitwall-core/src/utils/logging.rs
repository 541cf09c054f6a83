//! Subscriber setup for the binaries.
//!
//! The library only emits `log` records; these helpers install a
//! `tracing-subscriber` formatter that picks them up.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::StorageError;

/// Level used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Log to stderr. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {}", e);
    }
}

/// `<data dir>/pitwall/<file_name>`, e.g. `~/.local/share/pitwall/pitwall-tui.log`.
pub fn default_log_path(file_name: &str) -> Result<PathBuf, StorageError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("pitwall").join(file_name))
        .ok_or(StorageError::ConfigDirNotFound)
}

/// Log to `path` (appending), without ANSI colors. Used by the TUI so the
/// terminal is never written to.
pub fn init_file_logging(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
            path: parent.to_string_lossy().to_string(),
            source,
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(false))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    if let Err(e) = result {
        log::warn!("File logging not installed: {}", e);
    }
    Ok(())
}
