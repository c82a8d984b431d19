//! PocketBase record store client
//!
//! Admin-authenticated access to the `submissions` collection: record fetch,
//! asset file download, and the final status update. Requests are issued one
//! at a time and never retried.

use crate::error::{ImportError, ImportResult};
use crate::models::{Submission, SubmissionStatus};
use crate::services::backend::SubmissionBackend;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::json;
use std::time::Duration;

const COLLECTION: &str = "submissions";
const USER_AGENT: &str = concat!("dashicons-import/", env!("CARGO_PKG_VERSION"));

/// PocketBase API client
pub struct PocketBaseClient {
    http_client: reqwest::Client,
    base_url: String,
    admin_token: String,
}

impl PocketBaseClient {
    /// Create a client
    ///
    /// Trailing slashes on `base_url` are stripped. `timeout` of `None`
    /// leaves requests unbounded.
    pub fn new(base_url: &str, admin_token: &str, timeout: Option<Duration>) -> ImportResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ImportError::Network(e.to_string()))?;

        Ok(Self::with_http_client(http_client, base_url, admin_token))
    }

    /// Create a client over an already configured `reqwest::Client`
    pub fn with_http_client(http_client: reqwest::Client, base_url: &str, admin_token: &str) -> Self {
        Self {
            http_client,
            base_url: normalize_base_url(base_url),
            admin_token: admin_token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Record URL, optionally with the creator/approver expansion
    pub fn record_url(&self, submission_id: &str, expand: bool) -> String {
        let url = format!(
            "{}/api/collections/{}/records/{}",
            self.base_url, COLLECTION, submission_id
        );
        if expand {
            format!("{}?expand=created_by,approved_by", url)
        } else {
            url
        }
    }

    /// File URL with the filename percent-encoded
    pub fn file_url(&self, submission_id: &str, filename: &str) -> String {
        format!(
            "{}/api/files/{}/{}/{}",
            self.base_url,
            COLLECTION,
            submission_id,
            urlencoding::encode(filename)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.admin_token)
    }

    /// Pass 2xx responses through; turn anything else into `ImportError::Remote`
    async fn check(operation: &str, response: Response) -> ImportResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            operation = %operation,
            status = status.as_u16(),
            body = %body,
            "PocketBase request failed"
        );
        Err(ImportError::Remote {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SubmissionBackend for PocketBaseClient {
    async fn fetch_submission(&self, submission_id: &str) -> ImportResult<Submission> {
        let url = self.record_url(submission_id, true);
        tracing::debug!(submission_id = %submission_id, url = %url, "Fetching submission");

        let response = self.authorized(self.http_client.get(&url)).send().await?;
        let response = Self::check("Fetch submission", response).await?;

        let submission: Submission = response
            .json()
            .await
            .map_err(|e| ImportError::Parse(format!("Submission {}: {}", submission_id, e)))?;

        tracing::info!(
            submission_id = %submission.id,
            name = %submission.name,
            status = %submission.status,
            assets = submission.assets.len(),
            "Retrieved submission"
        );
        Ok(submission)
    }

    async fn download_asset(&self, submission_id: &str, filename: &str) -> ImportResult<Vec<u8>> {
        let url = self.file_url(submission_id, filename);
        tracing::debug!(file = %filename, url = %url, "Downloading asset");

        let response = self.authorized(self.http_client.get(&url)).send().await?;
        let response = Self::check("Download asset", response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn mark_added_to_collection(&self, submission_id: &str) -> ImportResult<()> {
        let url = self.record_url(submission_id, false);
        let body = json!({ "status": SubmissionStatus::AddedToCollection.as_str() });

        let response = self
            .authorized(self.http_client.patch(&url))
            .json(&body)
            .send()
            .await?;
        Self::check("Update submission status", response).await?;

        tracing::info!(submission_id = %submission_id, "Marked submission as added to collection");
        Ok(())
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
