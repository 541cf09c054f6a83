//! Error types for pitwall-tui.

use std::io;
use thiserror::Error;

use pitwall_core::error::AppError;

/// TUI-specific error type.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Configuration or client setup error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

impl From<AppError> for TuiError {
    fn from(err: AppError) -> Self {
        TuiError::Config(err.display_friendly())
    }
}
