//! Failure notifications for completed check runs.
//!
//! A [`NotificationEvent`] is built the moment a check completes with an
//! unsuccessful conclusion and handed to a [`Notifier`]. Delivery is
//! best-effort: notifiers log problems rather than returning them, so a
//! broken webhook never changes the outcome of a watch.

mod webhook;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use webhook::{NotifyError, WebhookNotifier};

use async_trait::async_trait;
use serde::Serialize;

use crate::github::models::{CheckConclusion, CheckRun};

/// Payload posted to the webhook for one unsuccessful check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    /// Check name.
    pub name: String,
    /// Conclusion as spelled by GitHub (e.g. `failure`).
    pub conclusion: String,
    /// Link to the check's detail page.
    pub check_url: String,
    /// Link to the commit the check ran against.
    pub commit_url: String,
}

impl NotificationEvent {
    /// Builds the event for a completed check run.
    #[must_use]
    pub fn for_check_run(run: &CheckRun, conclusion: CheckConclusion, commit_url: String) -> Self {
        Self {
            name: run.name.clone(),
            conclusion: conclusion.as_str().to_owned(),
            check_url: run.html_url.clone().unwrap_or_default(),
            commit_url,
        }
    }
}

/// Destination for failure notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one event. Failures are logged, never returned.
    async fn notify(&self, event: &NotificationEvent);
}
