//! Error types for the regtree store browser and editor.

use thiserror::Error;

/// Store-related errors
///
/// Every variant carries the human-readable subject (usually a qualified key
/// path or value name) so the CLI can surface it verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Key has subkeys and cannot be deleted: {0}")]
    NotEmpty(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StoreError {
    /// Stable short name of the error kind, used in JSON output and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::AccessDenied(_) => "access_denied",
            StoreError::NotEmpty(_) => "not_empty",
            StoreError::InvalidArgument(_) => "invalid_argument",
            StoreError::StoreUnavailable(_) => "store_unavailable",
            StoreError::Backend(_) => "backend",
            StoreError::IoError(_) => "io",
        }
    }
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(io) => StoreError::IoError(io),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Application-level errors for the CLI and run context
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::OutputError(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
