//! Outcome of a completed watch.

use crate::github::locator::CheckRunId;
use crate::github::models::CheckConclusion;

/// What happened to a check once it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The conclusion was unsuccessful and a notification was sent.
    Notified,
    /// The conclusion needed no notification.
    Ignored,
}

/// Final state of one watched check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Check run identifier.
    pub id: CheckRunId,
    /// Check name.
    pub name: String,
    /// Conclusion reported on completion, if GitHub sent one.
    pub conclusion: Option<CheckConclusion>,
    /// Whether a notification went out.
    pub disposition: Disposition,
}

/// Summary returned when every watched check reached a terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitReport {
    /// Check runs found on the commit, before filtering.
    pub discovered: usize,
    /// One entry per watched check, in completion order.
    pub outcomes: Vec<CheckOutcome>,
}

impl WaitReport {
    /// Number of checks that were polled.
    #[must_use]
    pub fn watched(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of checks that triggered a notification.
    #[must_use]
    pub fn notified(&self) -> usize {
        self.count(Disposition::Notified)
    }

    /// Number of checks that completed without a notification.
    #[must_use]
    pub fn ignored(&self) -> usize {
        self.count(Disposition::Ignored)
    }

    fn count(&self, disposition: Disposition) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.disposition == disposition)
            .count()
    }
}
