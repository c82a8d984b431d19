//! Import Pipeline Orchestrator
//!
//! Runs one submission through the full import:
//!
//! # Architecture
//! - **Phase 1**: Fetch the submission record
//! - **Phase 2**: Classify filenames, plan targets, assign assets
//! - **Phase 3**: Materialize assets into the collection tree
//! - **Phase 4**: Upsert the icon's metadata.json entry
//! - **Phase 5**: Mark the submission `added_to_collection`
//! - **Phase 6**: Emit step output for CI
//!
//! # Error Handling
//! - Any failure before phase 5 leaves the submission status untouched, so
//!   the run can be retried; phases 3 and 4 are idempotent.
//! - Soft conditions (unresolved target, existing file, unknown extension,
//!   unwritable step output) are logged and skipped.
//!
//! # Example
//! ```rust,ignore
//! let pipeline = ImportPipeline::new(&client, PipelineConfig::from(&config));
//! let report = pipeline.run("abc123").await?;
//! ```

use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::models::{MetadataEntry, Submission, SubmissionStatus, VariantKey, VariantTarget};
use crate::services::backend::SubmissionBackend;
use crate::services::materializer::{AssetMaterializer, MaterializeOutcome};
use crate::services::metadata_store::{build_entry, MetadataStore, DEFAULT_LOCK_TIMEOUT};
use crate::services::{assign, classify, plan, resolve_base_format, write_step_output};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Collection root holding `svg/`, `png/`, `webp/`
    pub root: PathBuf,
    /// metadata.json location
    pub metadata_path: PathBuf,
    /// Log intended actions only; no downloads, writes or status change
    pub dry_run: bool,
    /// Step output file, if any
    pub step_output: Option<PathBuf>,
    /// Wait limit for the metadata store lock
    pub lock_timeout: Duration,
}

impl PipelineConfig {
    /// Defaults for a collection rooted at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            metadata_path: root.join(crate::config::METADATA_FILE_NAME),
            root,
            dry_run: false,
            step_output: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl From<&ImportConfig> for PipelineConfig {
    fn from(config: &ImportConfig) -> Self {
        Self {
            root: config.root.clone(),
            metadata_path: config.metadata_path.clone(),
            dry_run: config.dry_run,
            step_output: config.step_output.clone(),
            lock_timeout: config.lock_timeout,
        }
    }
}

/// Result of a completed import
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub submission: Submission,
    /// Targets with their assigned sources
    pub targets: Vec<VariantTarget>,
    pub outcomes: Vec<(VariantKey, MaterializeOutcome)>,
    /// Entry written (or, in dry-run, that would have been written)
    pub entry: MetadataEntry,
    /// Whether the backend status was moved to `added_to_collection`
    pub status_updated: bool,
}

impl ImportReport {
    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_download()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.downloaded()
    }
}

/// Orchestrates one submission import
pub struct ImportPipeline<'a> {
    backend: &'a dyn SubmissionBackend,
    config: PipelineConfig,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(backend: &'a dyn SubmissionBackend, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Import one submission end to end
    pub async fn run(&self, submission_id: &str) -> ImportResult<ImportReport> {
        if self.config.dry_run {
            info!("Dry run: no files, metadata or status will be written");
        }

        // Phase 1: fetch
        let submission = self.backend.fetch_submission(submission_id).await?;
        if submission.status != SubmissionStatus::Approved {
            warn!(
                submission_id = %submission.id,
                status = %submission.status,
                "Submission is not in approved state; importing anyway"
            );
        }
        if submission.assets.is_empty() {
            return Err(ImportError::EmptyAssets(submission.id.clone()));
        }

        // Phase 2: resolve variants
        let targets = self.resolve_targets(&submission);

        // Phase 3: materialize
        let materializer =
            AssetMaterializer::new(self.backend, self.config.root.clone(), self.config.dry_run);
        let outcomes = materializer.materialize_all(&submission.id, &targets).await?;

        // Phase 4: metadata
        let entry = build_entry(&submission, &targets, dashicons_common::time::now());
        self.upsert_metadata(&submission.name, &entry).await?;

        // Phase 5: status
        let status_updated = if self.config.dry_run {
            info!(submission_id = %submission.id, "[dry-run] Would mark submission as added to collection");
            false
        } else {
            self.backend.mark_added_to_collection(&submission.id).await?;
            true
        };

        // Phase 6: step output
        // Status is already final here, so a broken output file only warns
        if let Some(path) = &self.config.step_output {
            if let Err(e) = write_step_output(path, &submission) {
                warn!(path = %path.display(), "Failed to write step output: {}", e);
            }
        }

        let report = ImportReport {
            submission,
            targets,
            outcomes,
            entry,
            status_updated,
        };

        info!(
            icon = %report.submission.name,
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            "Import complete"
        );
        Ok(report)
    }

    /// Classify, plan and assign for a submission
    pub fn resolve_targets(&self, submission: &Submission) -> Vec<VariantTarget> {
        let extras = submission.extras();
        let flags = classify(&submission.assets, &extras);
        let base_format = resolve_base_format(submission);
        let targets = assign(&submission.assets, plan(&submission.name, &flags, &base_format));

        for target in &targets {
            match &target.source_asset {
                Some(source) => info!(
                    variant = %target.key,
                    source = %source,
                    dest = %target.dest_filename,
                    "Resolved variant"
                ),
                None => warn!(
                    variant = %target.key,
                    dest = %target.dest_filename,
                    "No asset available for variant"
                ),
            }
        }

        targets
    }

    /// The store does blocking file IO and may wait on the lock
    async fn upsert_metadata(&self, icon_name: &str, entry: &MetadataEntry) -> ImportResult<()> {
        let store = MetadataStore::new(self.config.metadata_path.clone())
            .with_lock_timeout(self.config.lock_timeout);
        let icon_name = icon_name.to_string();
        let entry = entry.clone();
        let dry_run = self.config.dry_run;

        tokio::task::spawn_blocking(move || store.upsert(&icon_name, &entry, dry_run))
            .await
            .map_err(|e| ImportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}
