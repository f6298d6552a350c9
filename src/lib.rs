//! Checkwatch library crate for waiting on GitHub check runs.
//!
//! The library discovers the check runs attached to a commit, polls the
//! required ones until each completes, and posts a webhook notification for
//! every `failure` or `timed_out` conclusion. Octocrab is used for the GitHub
//! REST API and reqwest for webhook delivery.

pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod notify;
pub mod watch;

pub use config::{WatchConfig, WatchSettings};
pub use error::WatchError;
pub use github::{
    CheckConclusion, CheckRun, CheckRunGateway, CheckRunRepository, CheckStatus, CommitSha,
    OctocrabCheckRunGateway, PersonalAccessToken, RepositoryLocator,
};
pub use notify::{NotificationEvent, Notifier, WebhookNotifier};
pub use watch::{CheckWatcher, RequiredChecks, WaitReport, WatchTiming};
