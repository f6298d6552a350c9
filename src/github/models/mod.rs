//! Data models representing check runs attached to a commit.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::locator::CheckRunId;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Lifecycle status of a check run as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Waiting to be picked up by a runner.
    #[default]
    Queued,
    /// Currently running.
    InProgress,
    /// Finished; a conclusion is available.
    Completed,
    /// Waiting on a deployment protection rule.
    Waiting,
    /// Requested but not yet queued.
    Requested,
    /// Pending on a concurrency group.
    Pending,
    /// Any status GitHub adds later.
    #[serde(other)]
    Unknown,
}

impl CheckStatus {
    /// Returns the API value for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Requested => "requested",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true once the check has finished.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal outcome of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// The check passed.
    Success,
    /// The check failed.
    Failure,
    /// Neither passed nor failed.
    Neutral,
    /// The check was cancelled.
    Cancelled,
    /// The check was skipped.
    Skipped,
    /// The check exceeded its own time limit.
    TimedOut,
    /// The check needs manual action.
    ActionRequired,
    /// The check result went stale.
    Stale,
    /// The workflow could not start.
    StartupFailure,
    /// Any conclusion GitHub adds later.
    #[serde(other)]
    Unknown,
}

impl CheckConclusion {
    /// Returns the API value for this conclusion.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::TimedOut => "timed_out",
            Self::ActionRequired => "action_required",
            Self::Stale => "stale",
            Self::StartupFailure => "startup_failure",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for the conclusions that trigger a notification.
    #[must_use]
    pub const fn is_unsuccessful(&self) -> bool {
        matches!(self, Self::Failure | Self::TimedOut)
    }
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Snapshot of one check run at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    /// Check run identifier.
    pub id: CheckRunId,
    /// Display name, matched against the required checks.
    pub name: String,
    /// Status at fetch time.
    pub status: CheckStatus,
    /// Conclusion, present once the status is `completed`.
    pub conclusion: Option<CheckConclusion>,
    /// Link to the check's detail page.
    pub html_url: Option<String>,
    /// Commit the check ran against.
    pub head_sha: String,
}

/// One page of check runs for a commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckRunPage {
    /// Check runs on this page, in provider order.
    pub check_runs: Vec<CheckRun>,
    /// Total number of check runs reported for the commit.
    pub total_count: u64,
    /// Next page number when GitHub advertised one.
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCheckRun {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) status: CheckStatus,
    pub(crate) conclusion: Option<CheckConclusion>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) head_sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCheckRunList {
    pub(crate) total_count: u64,
    #[serde(default)]
    pub(crate) check_runs: Vec<ApiCheckRun>,
}

impl From<ApiCheckRun> for CheckRun {
    fn from(value: ApiCheckRun) -> Self {
        Self {
            id: CheckRunId::new(value.id),
            name: value.name,
            status: value.status,
            conclusion: value.conclusion,
            html_url: value.html_url,
            head_sha: value.head_sha,
        }
    }
}
