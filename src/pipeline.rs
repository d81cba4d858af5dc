//! The failure-extraction pipeline.
//!
//! Two entry modes: `receive_report` accepts a pre-collected notification
//! (push), `analyze_workflow` drives the full locate → fetch → summarize →
//! extract sequence against the GitHub API (pull). Every invocation is
//! stateless and independent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FailtraceError, Result};
use crate::github::{GitHubClient, WorkflowRun};
use crate::logscan::extract_error_excerpt;
use crate::report::{summarize_failures, FailureReport};

/// Notification body relayed from an external CI failure hook.
///
/// Field names mirror the inbound JSON (`runId`, `errorLog`, ...). Only
/// `errorLog` is required; everything else is echoed back as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushedReport {
    #[serde(default)]
    pub run_id: Option<u64>,
    #[serde(default)]
    pub run_url: Option<String>,
    #[serde(default)]
    pub failed_jobs: Option<serde_json::Value>,
    #[serde(default)]
    pub error_log: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Acknowledgement returned for an accepted push-mode report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAck {
    pub status: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: ReportMetadata,
}

/// Echo of the optional notification fields; absent values serialize as
/// null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub run_id: Option<u64>,
    pub run_url: Option<String>,
    pub failed_jobs: Option<serde_json::Value>,
    pub repository: Option<String>,
}

/// Outcome of a pull-mode analysis.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// The workflow has no completed run with a failing conclusion.
    NoFailingRun,
    Analyzed(AnalysisResult),
}

/// Combined result of one pull-mode pipeline invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// The failing run that was analyzed
    pub run: WorkflowRun,
    /// Failed jobs and steps of that run
    pub failure_report: FailureReport,
    /// Bounded error excerpt extracted from the run's logs
    pub error_excerpt: String,
}

/// Validate and acknowledge a pushed failure report.
///
/// `errorLog` is the one mandatory field; a report without it is rejected.
/// The report is otherwise accepted as-is - no further processing happens
/// in this mode.
pub fn receive_report(report: &PushedReport) -> Result<ReportAck> {
    if report.error_log.is_none() {
        return Err(FailtraceError::Validation { field: "errorLog" });
    }

    log::info!(
        "Received failure report (run: {:?}, repository: {:?})",
        report.run_id,
        report.repository
    );

    Ok(ReportAck {
        status: "received",
        message: "Workflow failure report received".to_string(),
        timestamp: Utc::now(),
        metadata: ReportMetadata {
            run_id: report.run_id,
            run_url: report.run_url.clone(),
            failed_jobs: report.failed_jobs.clone(),
            repository: report.repository.clone(),
        },
    })
}

/// Run the full pipeline for a workflow: locate its most recent failing
/// run, fetch logs and jobs, summarize the failures and extract an error
/// excerpt.
///
/// Logs and jobs have no data dependency on each other and are fetched
/// concurrently. API errors from any fetch propagate unchanged.
pub async fn analyze_workflow(client: &GitHubClient, workflow: &str) -> Result<AnalysisOutcome> {
    let Some(run) = client.find_most_recent_failing_run(workflow).await? else {
        return Ok(AnalysisOutcome::NoFailingRun);
    };

    log::info!("Analyzing failing run {} created at {}", run.id, run.created_at);

    let (log_bytes, jobs) =
        tokio::try_join!(client.fetch_run_logs(run.id), client.fetch_jobs(run.id))?;

    let failure_report = summarize_failures(run.id, &jobs);

    // The logs endpoint serves a compressed archive. Unpacking it is
    // deferred, so the bytes are decoded lossily: a binary payload
    // degrades to a tail excerpt instead of failing the analysis.
    let log_text = String::from_utf8_lossy(&log_bytes);
    let error_excerpt = extract_error_excerpt(&log_text);

    Ok(AnalysisOutcome::Analyzed(AnalysisResult {
        run,
        failure_report,
        error_excerpt,
    }))
}
