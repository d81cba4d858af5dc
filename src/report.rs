//! Failure summaries derived from a run's job listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{Conclusion, Job};

/// Flattened view over a run's failed jobs and their failed steps.
///
/// Built fresh per analysis and never mutated afterwards; it holds no
/// references back to the source objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Run the report was derived from
    pub run_id: u64,
    /// Number of failed jobs in the run
    pub failed_jobs_count: usize,
    /// Failed jobs, in the order the API listed them
    pub failed_jobs: Vec<FailedJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    /// Name of the job
    pub name: String,
    /// Conclusion of the job
    pub conclusion: Option<Conclusion>,
    /// When the job started
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Failed steps within the job, in ascending step number
    pub failed_steps: Vec<FailedStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedStep {
    /// Name of the step
    pub name: String,
    /// Step number within the job (1-based)
    pub number: u32,
    /// When the step started
    pub started_at: Option<DateTime<Utc>>,
    /// When the step completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Reduce a run's jobs to the ones that failed, keeping only their failed
/// steps.
///
/// Both filters are stable, so jobs keep the API's ordering and steps stay
/// in ascending step number. A run with a failing conclusion can still
/// report zero failed jobs (job-level conclusions are not always consistent
/// with the run level); that yields an empty report, not an error.
pub fn summarize_failures(run_id: u64, jobs: &[Job]) -> FailureReport {
    let failed_jobs: Vec<FailedJob> = jobs
        .iter()
        .filter(|job| job.conclusion.is_some_and(Conclusion::is_failure))
        .map(|job| FailedJob {
            name: job.name.clone(),
            conclusion: job.conclusion,
            started_at: job.started_at,
            completed_at: job.completed_at,
            failed_steps: job
                .steps
                .iter()
                .filter(|step| step.conclusion.is_some_and(Conclusion::is_failure))
                .map(|step| FailedStep {
                    name: step.name.clone(),
                    number: step.number,
                    started_at: step.started_at,
                    completed_at: step.completed_at,
                })
                .collect(),
        })
        .collect();

    FailureReport {
        run_id,
        failed_jobs_count: failed_jobs.len(),
        failed_jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Step;

    fn step(name: &str, number: u32, conclusion: Conclusion) -> Step {
        Step {
            name: name.to_string(),
            number,
            conclusion: Some(conclusion),
            started_at: None,
            completed_at: None,
        }
    }

    fn job(id: u64, name: &str, conclusion: Conclusion, steps: Vec<Step>) -> Job {
        Job {
            id,
            name: name.to_string(),
            conclusion: Some(conclusion),
            started_at: None,
            completed_at: None,
            steps,
        }
    }

    #[test]
    fn test_failed_job_with_one_failed_step() {
        let jobs = vec![
            job(
                1,
                "build",
                Conclusion::Failure,
                vec![
                    step("compile", 1, Conclusion::Failure),
                    step("test", 2, Conclusion::Success),
                ],
            ),
            job(2, "lint", Conclusion::Success, vec![]),
        ];

        let report = summarize_failures(77, &jobs);

        assert_eq!(report.run_id, 77);
        assert_eq!(report.failed_jobs_count, 1);
        assert_eq!(report.failed_jobs.len(), 1);
        assert_eq!(report.failed_jobs[0].name, "build");
        assert_eq!(report.failed_jobs[0].failed_steps.len(), 1);
        assert_eq!(report.failed_jobs[0].failed_steps[0].name, "compile");
        assert_eq!(report.failed_jobs[0].failed_steps[0].number, 1);
    }

    #[test]
    fn test_zero_failed_jobs_is_an_empty_report() {
        let jobs = vec![
            job(1, "build", Conclusion::Success, vec![]),
            job(2, "lint", Conclusion::Cancelled, vec![]),
        ];

        let report = summarize_failures(5, &jobs);

        assert_eq!(report.failed_jobs_count, 0);
        assert!(report.failed_jobs.is_empty());
    }

    #[test]
    fn test_job_without_conclusion_is_not_counted() {
        let jobs = vec![Job {
            id: 1,
            name: "in-flight".to_string(),
            conclusion: None,
            started_at: None,
            completed_at: None,
            steps: vec![],
        }];

        let report = summarize_failures(5, &jobs);

        assert_eq!(report.failed_jobs_count, 0);
    }

    #[test]
    fn test_order_of_jobs_and_steps_is_preserved() {
        let jobs = vec![
            job(
                1,
                "unit",
                Conclusion::Failure,
                vec![
                    step("setup", 1, Conclusion::Failure),
                    step("run", 2, Conclusion::Failure),
                    step("teardown", 3, Conclusion::Failure),
                ],
            ),
            job(2, "docs", Conclusion::Success, vec![]),
            job(3, "e2e", Conclusion::Failure, vec![]),
        ];

        let report = summarize_failures(9, &jobs);

        let names: Vec<&str> = report.failed_jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["unit", "e2e"]);

        let numbers: Vec<u32> = report.failed_jobs[0]
            .failed_steps
            .iter()
            .map(|s| s.number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_summarize_is_idempotent_and_count_matches_length() {
        let jobs = vec![
            job(1, "a", Conclusion::Failure, vec![]),
            job(2, "b", Conclusion::Failure, vec![]),
        ];

        let first = summarize_failures(3, &jobs);
        let second = summarize_failures(3, &jobs);

        assert_eq!(first, second);
        assert_eq!(first.failed_jobs_count, first.failed_jobs.len());
    }
}
