//! Helpers for reading raw GitHub responses.

use http::HeaderMap;
use http::header::{HeaderValue, LINK};
use url::Url;

use super::error_mapping::ErrorDetail;

const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

pub(super) fn header_to_string(header_value: Option<&HeaderValue>) -> Option<String> {
    header_value
        .and_then(|raw| raw.to_str().ok())
        .map(ToOwned::to_owned)
}

/// Extracts GitHub's `message` and `documentation_url` from an error body,
/// plus the rate limit reset time from the response headers.
pub(super) fn error_detail(headers: &HeaderMap, body: &str) -> ErrorDetail {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
    };

    ErrorDetail {
        message: field("message"),
        documentation_url: field("documentation_url"),
        reset_at: header_to_string(headers.get(RATE_LIMIT_RESET))
            .and_then(|raw| raw.trim().parse::<u64>().ok()),
    }
}

/// Returns the page number advertised as `rel="next"` in a `Link` header.
pub(super) fn next_page(headers: &HeaderMap) -> Option<u32> {
    header_to_string(headers.get(LINK)).and_then(|link| next_page_from_link(&link))
}

fn next_page_from_link(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .is_some_and(|rel| rel.trim_matches('"') == "next")
        });
        if !is_next {
            return None;
        }

        let url = Url::parse(target.trim_start_matches('<').trim_end_matches('>')).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
    })
}
