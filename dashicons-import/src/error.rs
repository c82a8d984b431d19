//! Error types for dashicons-import

use thiserror::Error;

/// Import pipeline error
#[derive(Debug, Error)]
pub enum ImportError {
    /// Missing or invalid configuration (fails before any network activity)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-success status
    #[error("{operation} failed with HTTP {status}: {body}")]
    Remote {
        operation: String,
        status: u16,
        body: String,
    },

    /// Request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response or file content could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Submission has nothing to import
    #[error("Submission {0} has no assets")]
    EmptyAssets(String),

    /// metadata.json is unreadable or has an unexpected shape
    #[error("Metadata store error: {0}")]
    Store(String),

    /// Another import holds the metadata store lock
    #[error("Metadata store is locked by another import: {0}")]
    StoreLocked(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// dashicons-common error
    #[error("Common error: {0}")]
    Common(#[from] dashicons_common::Error),
}

impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        ImportError::Network(err.to_string())
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
