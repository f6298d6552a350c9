//! Check run discovery and single-run lookups over a gateway.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::WatchError;

use super::gateway::CheckRunGateway;
use super::locator::{CheckRunId, CommitSha, RepositoryLocator};
use super::models::CheckRun;

/// Reads check runs for one repository through a shared gateway.
///
/// Cloning is cheap; every poll task holds its own clone.
pub struct CheckRunRepository<Gateway>
where
    Gateway: CheckRunGateway + ?Sized,
{
    gateway: Arc<Gateway>,
    locator: Arc<RepositoryLocator>,
}

impl<Gateway> Clone for CheckRunRepository<Gateway>
where
    Gateway: CheckRunGateway + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            locator: Arc::clone(&self.locator),
        }
    }
}

impl<Gateway> CheckRunRepository<Gateway>
where
    Gateway: CheckRunGateway + ?Sized,
{
    /// Creates a repository reading `locator` through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<Gateway>, locator: RepositoryLocator) -> Self {
        Self {
            gateway,
            locator: Arc::new(locator),
        }
    }

    /// The repository being read.
    #[must_use]
    pub fn locator(&self) -> &RepositoryLocator {
        &self.locator
    }

    /// Fetches every check run attached to `sha`, following pagination until
    /// GitHub stops advertising a next page.
    ///
    /// Results keep provider order. A failure on any page discards the pages
    /// already fetched.
    ///
    /// # Errors
    ///
    /// Propagates the first gateway failure, and returns `WatchError::Api`
    /// when the advertised next page does not advance.
    pub async fn fetch_all(&self, sha: &CommitSha) -> Result<Vec<CheckRun>, WatchError> {
        let first = self
            .gateway
            .list_check_runs_for_ref(&self.locator, sha, 1)
            .await?;

        if first.total_count == 0 {
            info!(commit = %sha, "no check runs found");
            return Ok(Vec::new());
        }

        let mut check_runs = first.check_runs;
        let mut current_page = 1_u32;
        let mut next_page = first.next_page;

        while let Some(page) = next_page {
            if page <= current_page {
                return Err(WatchError::Api {
                    message: format!(
                        "list check runs: next page {page} does not follow page {current_page}"
                    ),
                });
            }

            debug!(commit = %sha, page, "fetching next page of check runs");
            let fetched = self
                .gateway
                .list_check_runs_for_ref(&self.locator, sha, page)
                .await?;
            check_runs.extend(fetched.check_runs);
            current_page = page;
            next_page = fetched.next_page;
        }

        debug!(commit = %sha, count = check_runs.len(), "discovered check runs");
        Ok(check_runs)
    }

    /// Fetches the current snapshot of one check run.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures unchanged.
    pub async fn get_one(&self, id: CheckRunId) -> Result<CheckRun, WatchError> {
        self.gateway.check_run(&self.locator, id).await
    }
}
