//! Per-check poll task.
//!
//! A task queries one check until GitHub reports it `completed`, then either
//! notifies (for `failure` and `timed_out`) or ignores the conclusion. A
//! failed status query ends the task immediately; there is no retry.
//!
//! The commit link in a notification points at the check's own head SHA,
//! not at the ref the watch was started with.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::WatchError;
use crate::github::gateway::CheckRunGateway;
use crate::github::locator::CommitSha;
use crate::github::models::{CheckConclusion, CheckRun};
use crate::github::repository::CheckRunRepository;
use crate::notify::{NotificationEvent, Notifier};

use super::report::{CheckOutcome, Disposition};
use super::timing::WatchTiming;

pub(super) struct PollTask<Gateway, Notify>
where
    Gateway: CheckRunGateway + ?Sized,
    Notify: Notifier + ?Sized,
{
    pub(super) repository: CheckRunRepository<Gateway>,
    pub(super) notifier: Arc<Notify>,
    pub(super) requested: CommitSha,
    pub(super) timing: WatchTiming,
    pub(super) cancel: CancellationToken,
}

impl<Gateway, Notify> PollTask<Gateway, Notify>
where
    Gateway: CheckRunGateway + ?Sized,
    Notify: Notifier + ?Sized,
{
    pub(super) async fn run(self, check: CheckRun) -> Result<CheckOutcome, WatchError> {
        let polled = tokio::select! {
            () = self.cancel.cancelled() => Err(WatchError::Cancelled),
            result = self.poll_with_limit(&check) => result,
        };

        match polled {
            Ok(completed) => Ok(self.handle_completion(completed).await),
            Err(error) => {
                warn!(check = %check.name, %error, "stopped watching check");
                Err(error)
            }
        }
    }

    async fn poll_with_limit(&self, check: &CheckRun) -> Result<CheckRun, WatchError> {
        let Some(limit) = self.timing.max_wait else {
            return self.poll_until_complete(check).await;
        };

        tokio::time::timeout(limit, self.poll_until_complete(check))
            .await
            .unwrap_or_else(|_elapsed| {
                Err(WatchError::PollTimeout {
                    check: check.name.clone(),
                    waited_seconds: limit.as_secs(),
                })
            })
    }

    async fn poll_until_complete(&self, check: &CheckRun) -> Result<CheckRun, WatchError> {
        loop {
            let snapshot = self.repository.get_one(check.id).await?;
            info!(check = %snapshot.name, status = %snapshot.status, "check status");

            if snapshot.status.is_completed() {
                return Ok(snapshot);
            }

            tokio::time::sleep(self.timing.poll_interval).await;
        }
    }

    async fn handle_completion(&self, completed: CheckRun) -> CheckOutcome {
        let conclusion = completed.conclusion;
        let reported = conclusion.unwrap_or(CheckConclusion::Unknown);
        info!(check = %completed.name, conclusion = %reported, "check completed");

        let disposition = if reported.is_unsuccessful() {
            let event =
                NotificationEvent::for_check_run(&completed, reported, self.commit_url(&completed));
            self.notifier.notify(&event).await;
            Disposition::Notified
        } else {
            Disposition::Ignored
        };

        CheckOutcome {
            id: completed.id,
            name: completed.name,
            conclusion,
            disposition,
        }
    }

    /// Links the commit the check ran on, or the requested ref when GitHub
    /// omitted `head_sha`.
    fn commit_url(&self, completed: &CheckRun) -> String {
        let sha = CommitSha::new(&completed.head_sha).unwrap_or_else(|_| self.requested.clone());
        self.repository.locator().commit_url(&sha)
    }
}
