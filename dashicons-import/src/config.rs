//! Configuration resolution for dashicons-import
//!
//! Backend settings resolve command line → environment → TOML. Missing
//! required settings fail before any network activity, naming the missing
//! item.

use crate::error::{ImportError, ImportResult};
use crate::services::metadata_store::DEFAULT_LOCK_TIMEOUT;
use crate::services::step_output::GITHUB_OUTPUT_ENV;
use dashicons_common::config::{resolve_setting, TomlConfig};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Backend base URL
pub const PB_URL_ENV: &str = "PB_URL";

/// Admin bearer credential
pub const PB_ADMIN_TOKEN_ENV: &str = "PB_ADMIN_TOKEN";

/// Metadata store file name under the collection root
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Values taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub submission_id: Option<String>,
    pub dry_run: bool,
    pub gha_output: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
}

/// Fully resolved settings for one import run
#[derive(Clone)]
pub struct ImportConfig {
    pub submission_id: String,
    pub pb_url: String,
    pub pb_admin_token: String,
    pub dry_run: bool,
    /// Collection root holding `svg/`, `png/`, `webp/`
    pub root: PathBuf,
    pub metadata_path: PathBuf,
    /// Step output file; `None` disables step output
    pub step_output: Option<PathBuf>,
    pub http_timeout: Option<Duration>,
    pub lock_timeout: Duration,
}

impl fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfig")
            .field("submission_id", &self.submission_id)
            .field("pb_url", &self.pb_url)
            .field("pb_admin_token", &"<redacted>")
            .field("dry_run", &self.dry_run)
            .field("root", &self.root)
            .field("metadata_path", &self.metadata_path)
            .field("step_output", &self.step_output)
            .field("http_timeout", &self.http_timeout)
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}

impl ImportConfig {
    /// Resolve the run configuration
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> ImportResult<Self> {
        let submission_id = cli
            .submission_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ImportError::Config("--submission-id is required".to_string()))?;

        let (pb_url, url_source) = resolve_setting(None, PB_URL_ENV, toml.pb_url.as_deref())
            .ok_or_else(|| {
                ImportError::Config(format!("{} environment variable is required", PB_URL_ENV))
            })?;
        let pb_url = pb_url.trim().trim_end_matches('/').to_string();
        if pb_url.is_empty() {
            return Err(ImportError::Config(format!("{} must not be empty", PB_URL_ENV)));
        }

        let (pb_admin_token, token_source) =
            resolve_setting(None, PB_ADMIN_TOKEN_ENV, toml.pb_admin_token.as_deref()).ok_or_else(
                || ImportError::Config(format!("{} environment variable is required", PB_ADMIN_TOKEN_ENV)),
            )?;

        info!(url = %pb_url, source = %url_source, "Backend URL resolved");
        info!(source = %token_source, "Admin token resolved");

        let step_output = cli.gha_output.or_else(|| {
            std::env::var(GITHUB_OUTPUT_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });

        let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
        let metadata_path = cli.metadata.unwrap_or_else(|| root.join(METADATA_FILE_NAME));

        Ok(Self {
            submission_id,
            pb_url,
            pb_admin_token,
            dry_run: cli.dry_run,
            root,
            metadata_path,
            step_output,
            http_timeout: toml.http_timeout_secs.map(Duration::from_secs),
            lock_timeout: toml
                .lock_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LOCK_TIMEOUT),
        })
    }
}
