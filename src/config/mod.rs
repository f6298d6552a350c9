//! Watcher configuration loaded from CLI, environment, and files.
//!
//! [`WatchConfig`] merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach.
//! [`WatchConfig::resolve`] then validates the merged values and produces the
//! typed [`WatchSettings`] the watcher runs with.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.checkwatch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `INPUT_GITHUB_TOKEN`, `INPUT_COMMIT_SHA`, and
//!    so on, as exported for GitHub Action inputs
//! 4. **Command-line arguments** – `--github-token`, `--commit-sha`, ...
//!
//! When a string input is still unset after merging, the bare variable
//! (`GITHUB_TOKEN`, `GITHUB_REPO`, `COMMIT_SHA`, `SLACK_WEBHOOK`,
//! `REQUIRED_CHECKS`, `GITHUB_SERVER_URL`, `GITHUB_API_URL`) is consulted.
//!
//! # Configuration File
//!
//! ```toml
//! github_repo = "octo/widgets"
//! required_checks = "build,test"
//! poll_interval_seconds = 10
//! max_wait_seconds = 3600
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::WatchError;
use crate::github::locator::{CommitSha, PersonalAccessToken, RepositoryLocator};
use crate::watch::{
    DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY, RequiredChecks, WatchTiming,
};

const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_SETTLE_DELAY_SECONDS: u64 = DEFAULT_SETTLE_DELAY.as_secs();
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = DEFAULT_POLL_INTERVAL.as_secs();
const DEFAULT_WEBHOOK_TIMEOUT_SECONDS: u64 = 10;

/// Watcher configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use checkwatch::WatchConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = WatchConfig::load().expect("failed to load configuration");
/// let settings = config.resolve().expect("inputs should be complete");
/// println!("watching {}", settings.commit_sha);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "INPUT",
    discovery(
        dotfile_name = ".checkwatch.toml",
        config_file_name = "checkwatch.toml",
        app_name = "checkwatch"
    )
)]
pub struct WatchConfig {
    /// Token used to authenticate against the GitHub API.
    ///
    /// Can be provided via:
    /// - CLI: `--github-token <TOKEN>`
    /// - Environment: `INPUT_GITHUB_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `github_token = "..."`
    #[ortho_config()]
    pub github_token: Option<String>,

    /// Repository slug in `owner/name` form.
    ///
    /// Can be provided via:
    /// - CLI: `--github-repo <OWNER/NAME>`
    /// - Environment: `INPUT_GITHUB_REPO` or `GITHUB_REPO`
    /// - Config file: `github_repo = "..."`
    #[ortho_config()]
    pub github_repo: Option<String>,

    /// Commit whose check runs are watched.
    ///
    /// Can be provided via:
    /// - CLI: `--commit-sha <SHA>`
    /// - Environment: `INPUT_COMMIT_SHA` or `COMMIT_SHA`
    /// - Config file: `commit_sha = "..."`
    #[ortho_config()]
    pub commit_sha: Option<String>,

    /// Webhook receiving one JSON message per failed check.
    ///
    /// Can be provided via:
    /// - CLI: `--slack-webhook <URL>`
    /// - Environment: `INPUT_SLACK_WEBHOOK` or `SLACK_WEBHOOK`
    /// - Config file: `slack_webhook = "..."`
    #[ortho_config()]
    pub slack_webhook: Option<String>,

    /// Comma-separated check names to watch. Blank watches every check.
    #[ortho_config()]
    pub required_checks: Option<String>,

    /// Web base of the GitHub host. Defaults to `https://github.com`.
    #[ortho_config()]
    pub server_url: Option<String>,

    /// Explicit REST API base; derived from `server_url` when unset.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// Seconds to wait before discovering check runs.
    #[ortho_config()]
    pub settle_delay_seconds: u64,

    /// Seconds between two status queries of one check. Must be positive.
    #[ortho_config()]
    pub poll_interval_seconds: u64,

    /// Longest time, in seconds, a single check may be polled. Must be
    /// positive when set.
    #[ortho_config()]
    pub max_wait_seconds: Option<u64>,

    /// Deadline, in seconds, for the whole watch. Must be positive when set.
    #[ortho_config()]
    pub overall_timeout_seconds: Option<u64>,

    /// Timeout, in seconds, for one webhook delivery.
    #[ortho_config()]
    pub webhook_timeout_seconds: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_repo: None,
            commit_sha: None,
            slack_webhook: None,
            required_checks: None,
            server_url: None,
            api_url: None,
            settle_delay_seconds: DEFAULT_SETTLE_DELAY_SECONDS,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            max_wait_seconds: None,
            overall_timeout_seconds: None,
            webhook_timeout_seconds: DEFAULT_WEBHOOK_TIMEOUT_SECONDS,
        }
    }
}

/// Validated inputs for one watch.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// GitHub token.
    pub token: PersonalAccessToken,
    /// Repository and host being watched.
    pub locator: RepositoryLocator,
    /// Commit whose checks are watched.
    pub commit_sha: CommitSha,
    /// Failure webhook.
    pub webhook: Url,
    /// Parsed allow-list of check names.
    pub required_checks: RequiredChecks,
    /// Settle, poll, and per-check limits.
    pub timing: WatchTiming,
    /// Deadline for the whole watch, if any.
    pub overall_timeout: Option<Duration>,
    /// Timeout for one webhook delivery.
    pub webhook_timeout: Duration,
}

// Bare environment variables consulted when an input is unset.
const FALLBACK_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
const FALLBACK_GITHUB_REPO: &str = "GITHUB_REPO";
const FALLBACK_COMMIT_SHA: &str = "COMMIT_SHA";
const FALLBACK_SLACK_WEBHOOK: &str = "SLACK_WEBHOOK";
const FALLBACK_REQUIRED_CHECKS: &str = "REQUIRED_CHECKS";
const FALLBACK_SERVER_URL: &str = "GITHUB_SERVER_URL";
const FALLBACK_API_URL: &str = "GITHUB_API_URL";

impl WatchConfig {
    /// Validates the merged configuration, falling back to the bare
    /// environment variables for unset string inputs.
    ///
    /// # Errors
    ///
    /// See [`WatchConfig::resolve_with`].
    pub fn resolve(&self) -> Result<WatchSettings, WatchError> {
        self.resolve_with(|name| env::var(name).ok())
    }

    /// Validates the merged configuration, using `fallback` to look up the
    /// bare variable for each unset string input.
    ///
    /// Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Configuration` naming every missing required
    /// input at once, or when `poll_interval_seconds`, `max_wait_seconds` or
    /// `overall_timeout_seconds` is zero. Returns
    /// `WatchError::InvalidRepository` or `WatchError::InvalidUrl` when a
    /// present value is malformed.
    pub fn resolve_with<F>(&self, fallback: F) -> Result<WatchSettings, WatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |value: Option<&String>, name: &str| {
            non_blank(value.cloned()).or_else(|| non_blank(fallback(name)))
        };

        let token = pick(self.github_token.as_ref(), FALLBACK_GITHUB_TOKEN);
        let repo = pick(self.github_repo.as_ref(), FALLBACK_GITHUB_REPO);
        let sha = pick(self.commit_sha.as_ref(), FALLBACK_COMMIT_SHA);
        let webhook = pick(self.slack_webhook.as_ref(), FALLBACK_SLACK_WEBHOOK);

        let missing: Vec<&str> = [
            ("github_token", token.is_none()),
            ("github_repo", repo.is_none()),
            ("commit_sha", sha.is_none()),
            ("slack_webhook", webhook.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(token), Some(repo), Some(sha), Some(webhook)) = (token, repo, sha, webhook)
        else {
            return Err(WatchError::Configuration {
                message: format!("missing required inputs: {}", missing.join(", ")),
            });
        };

        for (name, seconds) in [
            ("poll_interval_seconds", Some(self.poll_interval_seconds)),
            ("max_wait_seconds", self.max_wait_seconds),
            ("overall_timeout_seconds", self.overall_timeout_seconds),
        ] {
            if seconds == Some(0) {
                return Err(WatchError::Configuration {
                    message: format!("{name} must be greater than zero"),
                });
            }
        }

        let server_url = pick(self.server_url.as_ref(), FALLBACK_SERVER_URL)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned());
        let mut locator = RepositoryLocator::from_slug(&repo, &server_url)?;
        if let Some(api_url) = pick(self.api_url.as_ref(), FALLBACK_API_URL) {
            locator = locator.with_api_base(&api_url)?;
        }

        let required_raw =
            pick(self.required_checks.as_ref(), FALLBACK_REQUIRED_CHECKS).unwrap_or_default();

        Ok(WatchSettings {
            token: PersonalAccessToken::new(token)?,
            locator,
            commit_sha: CommitSha::new(sha)?,
            webhook: Url::parse(webhook.trim())
                .map_err(|error| WatchError::InvalidUrl(format!("slack_webhook: {error}")))?,
            required_checks: RequiredChecks::parse(&required_raw),
            timing: WatchTiming {
                settle_delay: Duration::from_secs(self.settle_delay_seconds),
                poll_interval: Duration::from_secs(self.poll_interval_seconds),
                max_wait: self.max_wait_seconds.map(Duration::from_secs),
            },
            overall_timeout: self.overall_timeout_seconds.map(Duration::from_secs),
            webhook_timeout: Duration::from_secs(self.webhook_timeout_seconds),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|candidate| !candidate.trim().is_empty())
}

#[cfg(test)]
mod tests;
