//! Webhook delivery over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::error::WatchError;

use super::{NotificationEvent, Notifier};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Reasons a webhook delivery did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The request never produced a response.
    #[error("webhook request failed: {message}")]
    Transport {
        /// Transport-level error detail.
        message: String,
    },

    /// The receiver answered with something other than 200.
    #[error("webhook rejected the message with status {status}")]
    Rejected {
        /// HTTP status returned by the receiver.
        status: u16,
    },
}

/// Posts notification events as JSON to a webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    webhook: Url,
}

impl WebhookNotifier {
    /// Creates a notifier with the default request timeout.
    ///
    /// # Errors
    ///
    /// See [`WebhookNotifier::with_timeout`].
    pub fn new(webhook_url: &str) -> Result<Self, WatchError> {
        Self::with_timeout(webhook_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when the webhook URL cannot be parsed
    /// and `WatchError::Configuration` when the HTTP client cannot be built.
    pub fn with_timeout(webhook_url: &str, timeout: Duration) -> Result<Self, WatchError> {
        let webhook = Url::parse(webhook_url.trim())
            .map_err(|error| WatchError::InvalidUrl(format!("webhook URL: {error}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| WatchError::Configuration {
                message: format!("failed to configure webhook HTTP client: {error}"),
            })?;

        Ok(Self { client, webhook })
    }

    /// Posts `event` and reports whether the receiver accepted it.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Transport` when the request fails and
    /// `NotifyError::Rejected` for any status other than 200.
    pub async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.webhook.clone())
            .json(event)
            .send()
            .await
            .map_err(|error| NotifyError::Transport {
                message: error.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &NotificationEvent) {
        match self.deliver(event).await {
            Ok(()) => info!(check = %event.name, conclusion = %event.conclusion, "notification posted"),
            Err(error) => warn!(check = %event.name, %error, "failed to post notification"),
        }
    }
}
