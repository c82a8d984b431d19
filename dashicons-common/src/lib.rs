//! # Dashboard Icons Common Library
//!
//! Shared code for the Dashboard Icons command-line tools:
//! - Error and result types
//! - Bootstrap TOML configuration and setting resolution
//! - Tracing subscriber setup
//! - Timestamp formatting

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
