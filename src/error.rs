use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single upload attempt.
///
/// `Cancelled` is not a failure from the user's point of view: the controller
/// maps it back to `Idle` instead of `Error`.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload cancelled")]
    Cancelled,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server rejected upload with status {0}")]
    Status(StatusCode),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, UploadError::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid upload endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("invalid accepted type: {0}")]
    InvalidAcceptedType(String),

    #[error("label_max_chars must be at least 1")]
    InvalidLabelLength,
}
