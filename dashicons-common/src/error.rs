//! Common error types for Dashboard Icons tooling

use thiserror::Error;

/// Common result type for Dashboard Icons operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Dashboard Icons tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
