//! Service modules for the submission import workflow
//!
//! Leaf first: classifier → planner → assigner → materializer →
//! metadata store, with the backend client and step output at the edges.

pub mod assigner;
pub mod backend;
pub mod classifier;
pub mod materializer;
pub mod metadata_store;
pub mod planner;
pub mod pocketbase_client;
pub mod step_output;

pub use assigner::{assign, claim_fallback, claim_strict_match, AssetPool};
pub use backend::SubmissionBackend;
pub use classifier::{classify, VariantFlags};
pub use materializer::{AssetFormat, AssetMaterializer, MaterializeOutcome};
pub use metadata_store::{build_entry, MetadataStore, StoreLock};
pub use planner::{plan, resolve_base_format};
pub use pocketbase_client::PocketBaseClient;
pub use step_output::{step_output_lines, write_step_output, GITHUB_OUTPUT_ENV};
