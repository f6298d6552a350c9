//! Gateways for reading check runs through Octocrab.
//!
//! The watcher depends only on the narrow [`CheckRunGateway`] trait so tests
//! can substitute deterministic fixtures, while [`OctocrabCheckRunGateway`]
//! handles real HTTP requests.

mod check_runs;
mod client;
mod error_mapping;
mod http_utils;

pub use check_runs::OctocrabCheckRunGateway;

use async_trait::async_trait;

use crate::error::WatchError;
use crate::github::locator::{CheckRunId, CommitSha, RepositoryLocator};
use crate::github::models::{CheckRun, CheckRunPage};

/// Gateway that can read check runs for a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckRunGateway: Send + Sync {
    /// Fetch one page (1-based) of the check runs attached to a commit.
    async fn list_check_runs_for_ref(
        &self,
        locator: &RepositoryLocator,
        sha: &CommitSha,
        page: u32,
    ) -> Result<CheckRunPage, WatchError>;

    /// Fetch the current snapshot of a single check run.
    async fn check_run(
        &self,
        locator: &RepositoryLocator,
        id: CheckRunId,
    ) -> Result<CheckRun, WatchError>;
}
