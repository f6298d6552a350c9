//! Poll-and-wait orchestration over the check runs of one commit.
//!
//! [`CheckWatcher::wait_for_actions`] sleeps for the settle delay, discovers
//! the commit's check runs, keeps the ones named by the required list, and
//! polls each of them in its own task until it completes. Unsuccessful
//! conclusions are reported through the notifier; the watch itself only fails
//! on provider errors, per-check timeouts, or cancellation.

mod poll;
mod report;
mod required;
mod timing;

pub use report::{CheckOutcome, Disposition, WaitReport};
pub use required::RequiredChecks;
pub use timing::{DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY, WatchTiming};

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::WatchError;
use crate::github::gateway::CheckRunGateway;
use crate::github::locator::CommitSha;
use crate::github::repository::CheckRunRepository;
use crate::notify::Notifier;

use poll::PollTask;

/// Waits for every required check on a commit and reports failures.
pub struct CheckWatcher<Gateway, Notify>
where
    Gateway: CheckRunGateway + ?Sized + 'static,
    Notify: Notifier + ?Sized + 'static,
{
    repository: CheckRunRepository<Gateway>,
    notifier: Arc<Notify>,
    timing: WatchTiming,
    cancel: CancellationToken,
}

impl<Gateway, Notify> CheckWatcher<Gateway, Notify>
where
    Gateway: CheckRunGateway + ?Sized + 'static,
    Notify: Notifier + ?Sized + 'static,
{
    /// Creates a watcher with its own cancellation token.
    #[must_use]
    pub fn new(
        repository: CheckRunRepository<Gateway>,
        notifier: Arc<Notify>,
        timing: WatchTiming,
    ) -> Self {
        Self {
            repository,
            notifier,
            timing,
            cancel: CancellationToken::new(),
        }
    }

    /// Shares `cancel` with the watcher; cancelling it stops the settle delay
    /// and every outstanding poll.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this watcher.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the checks on `sha` named in the comma-separated
    /// `required_checks_raw` list (all checks when the list is blank).
    ///
    /// # Errors
    ///
    /// See [`CheckWatcher::wait_for_checks`].
    pub async fn wait_for_actions(
        &self,
        sha: &CommitSha,
        required_checks_raw: &str,
    ) -> Result<WaitReport, WatchError> {
        let required = RequiredChecks::parse(required_checks_raw);
        self.wait_for_checks(sha, &required).await
    }

    /// Waits for the checks on `sha` that match `required`.
    ///
    /// # Errors
    ///
    /// Returns the discovery error unchanged when listing check runs fails;
    /// nothing is polled in that case. Otherwise waits for every poll task
    /// and returns the first error any of them hit, `WatchError::Cancelled`
    /// when the token fired, or `WatchError::TaskFailed` when a task
    /// panicked.
    pub async fn wait_for_checks(
        &self,
        sha: &CommitSha,
        required: &RequiredChecks,
    ) -> Result<WaitReport, WatchError> {
        self.settle().await?;

        let check_runs = self.repository.fetch_all(sha).await.inspect_err(|error| {
            warn!(commit = %sha, %error, "failed to list check runs");
        })?;
        let discovered = check_runs.len();

        let mut join_set = JoinSet::new();
        for check in check_runs
            .into_iter()
            .filter(|check| required.matches(&check.name))
        {
            let task = PollTask {
                repository: self.repository.clone(),
                notifier: Arc::clone(&self.notifier),
                requested: sha.clone(),
                timing: self.timing,
                cancel: self.cancel.clone(),
            };
            join_set.spawn(task.run(check));
        }
        info!(
            commit = %sha,
            discovered,
            watched = join_set.len(),
            required = required.len(),
            unfiltered = required.is_empty(),
            "watching check runs"
        );

        let mut outcomes = Vec::with_capacity(join_set.len());
        let mut first_error = None;
        while let Some(joined) = join_set.join_next().await {
            let result = joined.unwrap_or_else(|join_error| {
                Err(WatchError::TaskFailed {
                    message: join_error.to_string(),
                })
            });
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    } else {
                        warn!(%error, "additional poll task failure");
                    }
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        let report = WaitReport {
            discovered,
            outcomes,
        };
        info!(
            watched = report.watched(),
            notified = report.notified(),
            ignored = report.ignored(),
            "all watched checks completed"
        );
        Ok(report)
    }

    async fn settle(&self) -> Result<(), WatchError> {
        info!(
            seconds = self.timing.settle_delay.as_secs(),
            "waiting for checks to be queued"
        );
        tokio::select! {
            () = self.cancel.cancelled() => Err(WatchError::Cancelled),
            () = tokio::time::sleep(self.timing.settle_delay) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests;
