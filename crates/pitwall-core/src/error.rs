use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("TransportError: {0}")]
    Transport(#[from] TransportError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
}

/// The single failure kind produced by remote calls.
///
/// Network failures, timeouts, undecodable bodies and non-2xx responses all
/// collapse into this type. `status` is `None` when no response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{endpoint}: {message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub endpoint: String,
    pub message: String,
}

impl TransportError {
    pub fn network(endpoint: &str, message: impl Into<String>) -> Self {
        Self {
            status: None,
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// Build an error from a non-2xx status and the raw response body.
    ///
    /// A JSON body carrying a string `detail` becomes the message verbatim;
    /// anything else falls back to `HTTP {status}`.
    pub fn from_status(status: u16, endpoint: &str, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .filter(|d| !d.is_empty());

        Self {
            status: Some(status),
            endpoint: endpoint.to_string(),
            message: detail.unwrap_or_else(|| format!("HTTP {}", status)),
        }
    }

    /// Message suitable for showing next to a degraded view.
    pub fn user_message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Stored data in slot '{slot}' is corrupt: {message}")]
    CorruptSlot { slot: String, message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("No stored key with id '{id}'")]
    KeyNotFound { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Transport(e) => match e.status {
                Some(status) if status >= 500 => ErrorSeverity::High,
                None => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Cli(_) => ErrorSeverity::Low,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Transport(e) => e.user_message().to_string(),
            AppError::Cli(CliError::KeyNotFound { id }) => {
                format!("No stored key with id '{}'. Run 'pitwall keys list'.", id)
            }
            _ => format!("{}", self),
        }
    }
}
