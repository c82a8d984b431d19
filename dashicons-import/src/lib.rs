//! dashicons-import library interface
//!
//! Imports approved Dashboard Icons submissions into the static collection:
//! resolves which uploaded asset plays which variant role, downloads assets
//! into `svg/`, `png/` and `webp/`, upserts `metadata.json`, and marks the
//! submission as added.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ImportError, ImportResult};
pub use crate::workflow::{ImportPipeline, ImportReport, PipelineConfig};
