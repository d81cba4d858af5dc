use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::auth::Token;
use crate::error::{FailtraceError, Result};

use super::types::{Job, WorkflowRun};

/// Page size used when listing workflow runs. The API returns runs newest
/// first, so one small page is enough to find the latest failing run.
const RUNS_PER_PAGE: usize = 10;

const DEFAULT_STATUS: &str = "completed";
const DEFAULT_CONCLUSION: &str = "failure";

const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// GitHub API client for fetching workflow run data.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL for GitHub API
    base_url: String,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `owner` - Repository owner/organization
    /// * `repo` - Repository name
    /// * `token` - Optional GitHub personal access token
    pub fn new(base_url: &str, owner: String, repo: String, token: Option<Token>) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| FailtraceError::Config(format!("Invalid base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("failtrace/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| FailtraceError::Config(format!("Invalid token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| FailtraceError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner,
            repo,
        })
    }

    /// Find the most recent run of a workflow that completed with a failing
    /// conclusion.
    ///
    /// The API returns runs in reverse-chronological order, which is taken
    /// as authoritative: the first element of the filtered listing is the
    /// most recent failure. Returns `Ok(None)` when the workflow has no
    /// failing runs - that is an expected outcome, not an error.
    pub async fn find_most_recent_failing_run(
        &self,
        workflow: &str,
    ) -> Result<Option<WorkflowRun>> {
        let mut runs = self
            .list_workflow_runs(workflow, DEFAULT_STATUS, DEFAULT_CONCLUSION)
            .await?;

        if runs.is_empty() {
            log::info!("No failing runs found for workflow: {workflow}");
            return Ok(None);
        }

        Ok(Some(runs.remove(0)))
    }

    /// List runs of a workflow, filtered by status and conclusion.
    ///
    /// Requests the first page only; `status` and `conclusion` are passed
    /// through to the API verbatim so callers can override the
    /// completed/failure defaults.
    pub async fn list_workflow_runs(
        &self,
        workflow: &str,
        status: &str,
        conclusion: &str,
    ) -> Result<Vec<WorkflowRun>> {
        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/runs?status={}&conclusion={}&per_page={}&page=1",
            self.base_url, self.owner, self.repo, workflow, status, conclusion, RUNS_PER_PAGE
        );

        let response = self.check(self.client.get(&url).send().await?).await?;
        let body: WorkflowRunsResponse = response.json().await?;

        Ok(body.workflow_runs)
    }

    /// Fetch the raw log archive for a workflow run.
    ///
    /// The endpoint answers with a compressed archive; the bytes are handed
    /// back uninterpreted. Unpacking the archive is the caller's problem.
    pub async fn fetch_run_logs(&self, run_id: u64) -> Result<Bytes> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}/logs",
            self.base_url, self.owner, self.repo, run_id
        );

        let response = self.check(self.client.get(&url).send().await?).await?;

        Ok(response.bytes().await?)
    }

    /// Fetch the jobs of a workflow run, in the order the API returns them.
    pub async fn fetch_jobs(&self, run_id: u64) -> Result<Vec<Job>> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}/jobs",
            self.base_url, self.owner, self.repo, run_id
        );

        let response = self.check(self.client.get(&url).send().await?).await?;
        let body: JobsResponse = response.json().await?;

        Ok(body.jobs)
    }

    /// Turn a non-success response into an API error carrying the status
    /// code and whatever body the server sent along.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(FailtraceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Response from GitHub API for workflow runs.
#[derive(Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<WorkflowRun>,
}

/// Response from GitHub API for workflow jobs.
#[derive(Deserialize)]
struct JobsResponse {
    jobs: Vec<Job>,
}
