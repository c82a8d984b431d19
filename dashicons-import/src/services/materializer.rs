//! Asset materialization
//!
//! Writes each resolved target into the collection tree under a directory
//! chosen by its extension. Existing files are never overwritten, which makes
//! re-running an import a per-file no-op.

use crate::error::{ImportError, ImportResult};
use crate::models::{VariantKey, VariantTarget};
use crate::services::backend::SubmissionBackend;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Collection subdirectory by file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Svg,
    Png,
    Webp,
}

impl AssetFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(AssetFormat::Svg),
            "png" => Some(AssetFormat::Png),
            "webp" => Some(AssetFormat::Webp),
            _ => None,
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            AssetFormat::Svg => "svg",
            AssetFormat::Png => "png",
            AssetFormat::Webp => "webp",
        }
    }
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    Downloaded { path: PathBuf, bytes: usize },
    SkippedExists { path: PathBuf },
    SkippedDryRun { path: PathBuf },
    SkippedNoSource,
}

impl MaterializeOutcome {
    pub fn is_download(&self) -> bool {
        matches!(self, MaterializeOutcome::Downloaded { .. })
    }
}

/// Destination directory for a target; unknown extensions land in `svg/`
pub fn destination_dir(root: &Path, target: &VariantTarget) -> PathBuf {
    let ext = target.dest_extension().unwrap_or_default();
    let format = AssetFormat::from_extension(&ext).unwrap_or_else(|| {
        warn!(
            file = %target.dest_filename,
            extension = %ext,
            "Unknown extension, defaulting to svg directory"
        );
        AssetFormat::Svg
    });
    root.join(format.dir_name())
}

/// Downloads resolved targets into a collection root
pub struct AssetMaterializer<'a> {
    backend: &'a dyn SubmissionBackend,
    root: PathBuf,
    dry_run: bool,
}

impl<'a> AssetMaterializer<'a> {
    pub fn new(backend: &'a dyn SubmissionBackend, root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            backend,
            root: root.into(),
            dry_run,
        }
    }

    /// Materialize one target
    ///
    /// A failed download is returned as an error and should end the run.
    pub async fn materialize(
        &self,
        submission_id: &str,
        target: &VariantTarget,
    ) -> ImportResult<MaterializeOutcome> {
        let Some(source) = target.source_asset.as_deref() else {
            warn!(variant = %target.key, file = %target.dest_filename, "No source asset resolved, skipping");
            return Ok(MaterializeOutcome::SkippedNoSource);
        };

        let dir = destination_dir(&self.root, target);
        let path = dir.join(&target.dest_filename);

        if tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "Destination exists, skipping");
            return Ok(MaterializeOutcome::SkippedExists { path });
        }

        if self.dry_run {
            info!(
                source = %source,
                path = %path.display(),
                "[dry-run] Would download asset"
            );
            return Ok(MaterializeOutcome::SkippedDryRun { path });
        }

        tokio::fs::create_dir_all(&dir).await?;

        let bytes = self.backend.download_asset(submission_id, source).await?;
        let len = bytes.len();
        write_atomically(dir, path.clone(), bytes).await?;

        info!(source = %source, path = %path.display(), bytes = len, "Saved asset");
        Ok(MaterializeOutcome::Downloaded { path, bytes: len })
    }

    /// Materialize every target sequentially, stopping at the first failure
    pub async fn materialize_all(
        &self,
        submission_id: &str,
        targets: &[VariantTarget],
    ) -> ImportResult<Vec<(VariantKey, MaterializeOutcome)>> {
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = self.materialize(submission_id, target).await?;
            outcomes.push((target.key, outcome));
        }
        Ok(outcomes)
    }
}

/// Write through a temp file in the same directory, then rename into place
///
/// An interrupted write never leaves a truncated file behind, so the
/// skip-if-exists check stays trustworthy on the next run.
async fn write_atomically(dir: PathBuf, path: PathBuf, bytes: Vec<u8>) -> ImportResult<()> {
    tokio::task::spawn_blocking(move || -> ImportResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| ImportError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| ImportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}
