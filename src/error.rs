//! Error types surfaced while configuring, discovering, and watching checks.

use thiserror::Error;

/// Errors surfaced while resolving inputs or talking to GitHub.
///
/// Unsuccessful check conclusions are not represented here: they are the
/// signal the watcher exists to report and travel through the notifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WatchError {
    /// Configuration could not be loaded or a required input is absent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The authentication token was missing or blank.
    #[error("personal access token is required")]
    MissingToken,

    /// The repository slug is not of the form `owner/name`.
    #[error("repository must be given as owner/name, got `{value}`")]
    InvalidRepository {
        /// The rejected slug.
        value: String,
    },

    /// A configured URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The commit reference was blank.
    #[error("commit SHA must not be empty")]
    InvalidCommitSha,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body or decoding detail describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub refused the request because the rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Unix timestamp at which the limit resets, when GitHub reported it.
        reset_at: Option<u64>,
        /// Error message from GitHub.
        message: String,
    },

    /// A check did not complete within the configured maximum wait.
    #[error("check `{check}` did not complete within {waited_seconds}s")]
    PollTimeout {
        /// Name of the check that was still running.
        check: String,
        /// The maximum wait that elapsed, in seconds.
        waited_seconds: u64,
    },

    /// The watch was cancelled before every check reached a terminal state.
    #[error("watch cancelled before all checks completed")]
    Cancelled,

    /// A poll task ended abnormally (panicked or was aborted).
    #[error("poll task failed: {message}")]
    TaskFailed {
        /// Join error detail.
        message: String,
    },
}

impl WatchError {
    /// Returns true when the error came from the GitHub API or transport
    /// rather than from local configuration or orchestration.
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::Api { .. }
                | Self::Network { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}
