//! Test helpers for constructing check run fixtures.
//!
//! Provides domain values for in-process test doubles and JSON bodies for
//! HTTP-level mocks, so both kinds of test describe check runs the same way.
//!
//! # Examples
//!
//! ```
//! use checkwatch::github::models::test_support::{completed_run, queued_run};
//! use checkwatch::github::CheckConclusion;
//!
//! let pending = queued_run(1, "build");
//! let done = completed_run(1, "build", CheckConclusion::Failure);
//! assert!(!pending.status.is_completed());
//! assert_eq!(done.conclusion, Some(CheckConclusion::Failure));
//! ```

use serde_json::{Value, json};

use super::{CheckConclusion, CheckRun, CheckStatus};
use crate::github::locator::CheckRunId;

/// Commit SHA used by the fixtures.
pub const FIXTURE_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

/// Constructs a check run that has not started yet.
#[must_use]
pub fn queued_run(id: u64, name: &str) -> CheckRun {
    CheckRun {
        id: CheckRunId::new(id),
        name: name.to_owned(),
        status: CheckStatus::Queued,
        conclusion: None,
        html_url: Some(format!("https://github.com/owner/repo/runs/{id}")),
        head_sha: FIXTURE_SHA.to_owned(),
    }
}

/// Constructs a check run that is running.
#[must_use]
pub fn in_progress_run(id: u64, name: &str) -> CheckRun {
    CheckRun {
        status: CheckStatus::InProgress,
        ..queued_run(id, name)
    }
}

/// Constructs a completed check run with the given conclusion.
#[must_use]
pub fn completed_run(id: u64, name: &str, conclusion: CheckConclusion) -> CheckRun {
    CheckRun {
        status: CheckStatus::Completed,
        conclusion: Some(conclusion),
        ..queued_run(id, name)
    }
}

/// Renders a check run the way the GitHub REST API returns it.
#[must_use]
pub fn check_run_json(run: &CheckRun) -> Value {
    json!({
        "id": run.id.get(),
        "name": run.name,
        "status": run.status.as_str(),
        "conclusion": run.conclusion.map(|conclusion| conclusion.as_str()),
        "html_url": run.html_url,
        "head_sha": run.head_sha,
    })
}

/// Renders a `list check runs for a Git reference` response body.
#[must_use]
pub fn check_run_list_json(total_count: u64, runs: &[CheckRun]) -> Value {
    json!({
        "total_count": total_count,
        "check_runs": runs.iter().map(check_run_json).collect::<Vec<_>>(),
    })
}
