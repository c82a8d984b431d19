//! Tracing subscriber setup shared by the command-line tools

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Fallback level when neither `RUST_LOG` nor configuration set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the log filter
///
/// `RUST_LOG` takes precedence so CI runs can turn on debug output for a
/// single module without touching the config.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global fmt subscriber, writing to stderr
///
/// Stdout is left clean for tools that print machine-readable output.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = build_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
