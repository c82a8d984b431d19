//! Submission import workflow
//!
//! One run imports one approved submission into the collection. See
//! [`pipeline`] for the phase breakdown.

pub mod pipeline;

pub use pipeline::{ImportPipeline, ImportReport, PipelineConfig};
