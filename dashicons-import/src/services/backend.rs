//! Record store seam
//!
//! The pipeline talks to the backend only through this trait, so tests can
//! drive a full import against an in-memory store.

use crate::error::ImportResult;
use crate::models::Submission;
use async_trait::async_trait;

/// Operations the import needs from the submission record store
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    /// Fetch a submission with `created_by` and `approved_by` expanded
    async fn fetch_submission(&self, submission_id: &str) -> ImportResult<Submission>;

    /// Download one uploaded asset verbatim
    async fn download_asset(&self, submission_id: &str, filename: &str) -> ImportResult<Vec<u8>>;

    /// Move the submission into its terminal `added_to_collection` state
    async fn mark_added_to_collection(&self, submission_id: &str) -> ImportResult<()>;
}
