use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    /// Statuses this tool does not act on (waiting, requested, pending, ...)
    #[serde(other)]
    Unknown,
}

/// Terminal outcome of a run, job or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Neutral,
    #[serde(other)]
    Unknown,
}

impl Conclusion {
    pub fn is_failure(self) -> bool {
        matches!(self, Conclusion::Failure)
    }
}

/// GitHub Actions workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Unique identifier for the workflow run
    pub id: u64,
    /// Name of the workflow
    pub name: Option<String>,
    /// Head branch or tag name
    pub head_branch: Option<String>,
    /// SHA of the head commit
    pub head_sha: String,
    /// Run number
    pub run_number: u64,
    /// Event that triggered the run
    pub event: String,
    /// Status of the run
    pub status: RunStatus,
    /// Conclusion of the run (success, failure, etc.)
    pub conclusion: Option<Conclusion>,
    /// Web URL of the run
    pub html_url: String,
    /// When the run was created
    pub created_at: DateTime<Utc>,
    /// When the run was updated
    pub updated_at: DateTime<Utc>,
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for the job
    pub id: u64,
    /// Name of the job
    pub name: String,
    /// Conclusion of the job
    pub conclusion: Option<Conclusion>,
    /// When the job started
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Steps in this job, in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Step within a GitHub Actions job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Name of the step
    pub name: String,
    /// Step number (1-based, defines order within the job)
    pub number: u32,
    /// Conclusion of the step
    pub conclusion: Option<Conclusion>,
    /// When the step started
    pub started_at: Option<DateTime<Utc>>,
    /// When the step completed
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclusion_deserializes_snake_case() {
        let c: Conclusion = serde_json::from_str("\"timed_out\"").unwrap();
        assert_eq!(c, Conclusion::TimedOut);
    }

    #[test]
    fn test_unknown_values_do_not_fail_deserialization() {
        let c: Conclusion = serde_json::from_str("\"stale\"").unwrap();
        assert_eq!(c, Conclusion::Unknown);

        let s: RunStatus = serde_json::from_str("\"requested\"").unwrap();
        assert_eq!(s, RunStatus::Unknown);
    }
}
