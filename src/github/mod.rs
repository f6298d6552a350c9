//! GitHub check run discovery and status lookups.
//!
//! This module wraps Octocrab to list the check runs attached to a commit,
//! following pagination, and to fetch the current snapshot of a single run.
//! Errors are mapped into [`WatchError`](crate::error::WatchError) variants so
//! callers can surface precise failures without exposing Octocrab internals.

pub mod gateway;
pub mod locator;
pub mod models;
pub mod repository;

pub use gateway::{CheckRunGateway, OctocrabCheckRunGateway};
pub use locator::{
    CheckRunId, CommitSha, PersonalAccessToken, RepositoryLocator, RepositoryName,
    RepositoryOwner,
};
pub use models::{CheckConclusion, CheckRun, CheckRunPage, CheckStatus};
pub use repository::CheckRunRepository;

#[cfg(test)]
pub use gateway::MockCheckRunGateway;
