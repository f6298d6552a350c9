//! Error mapping helpers for the Octocrab check run gateway.

use http::StatusCode;

use crate::error::WatchError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a failed response is GitHub's rate limit refusal, based on
/// the status and the message or documentation URL it carried.
pub(super) fn is_rate_limit(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> WatchError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            source.status_code,
            ErrorDetail {
                message: Some(source.message.clone()),
                documentation_url: source.documentation_url.clone(),
                reset_at: None,
            },
        );
    }

    if is_network_error(error) {
        return WatchError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    WatchError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// What GitHub said about a failed request.
#[derive(Debug, Default)]
pub(super) struct ErrorDetail {
    pub(super) message: Option<String>,
    pub(super) documentation_url: Option<String>,
    pub(super) reset_at: Option<u64>,
}

pub(super) fn map_http_error(operation: &str, status: StatusCode, detail: ErrorDetail) -> WatchError {
    let message = detail.message.unwrap_or_else(|| "unknown error".to_owned());

    if is_rate_limit(status, &message, detail.documentation_url.as_deref()) {
        let base_message = format!("{operation} failed: {message}");
        let full_message = match detail.reset_at {
            Some(reset) => format!("{base_message} (resets at {reset})"),
            None => base_message,
        };
        return WatchError::RateLimitExceeded {
            reset_at: detail.reset_at,
            message: full_message,
        };
    }

    if is_auth_failure(status) {
        WatchError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        WatchError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
