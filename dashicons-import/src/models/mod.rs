//! Data models for the import pipeline

pub mod metadata;
pub mod submission;
pub mod variant;

pub use metadata::{Author, MetadataEntry, UpdateInfo, VariantNames};
pub use submission::{
    ExpandedUser, Extras, HintPresence, Submission, SubmissionExpand, SubmissionStatus,
    VariantHints,
};
pub use variant::{VariantKey, VariantTarget};
