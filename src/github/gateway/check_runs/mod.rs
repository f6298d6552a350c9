//! Octocrab implementation of the check run gateway.

use async_trait::async_trait;
use http::{StatusCode, Uri};
use octocrab::Octocrab;

use crate::error::WatchError;
use crate::github::locator::{CheckRunId, CommitSha, PersonalAccessToken, RepositoryLocator};
use crate::github::models::{ApiCheckRun, ApiCheckRunList, CheckRun, CheckRunPage};

use super::CheckRunGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{ErrorDetail, is_rate_limit, map_http_error, map_octocrab_error};
use super::http_utils::{error_detail, next_page};

/// Largest page size the check runs endpoint accepts.
const PER_PAGE: u8 = 100;

const LIST_OPERATION: &str = "list check runs";
const GET_OPERATION: &str = "get check run";

/// Octocrab-backed check run gateway.
pub struct OctocrabCheckRunGateway {
    client: Octocrab,
}

impl OctocrabCheckRunGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository locator.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when the API base cannot be parsed or
    /// `WatchError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, WatchError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }

    async fn map_octocrab_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> WatchError {
        match error {
            octocrab::Error::GitHub { source, .. }
                if is_rate_limit(
                    source.status_code,
                    &source.message,
                    source.documentation_url.as_deref(),
                ) =>
            {
                map_http_error(
                    operation,
                    source.status_code,
                    ErrorDetail {
                        message: Some(source.message.clone()),
                        documentation_url: source.documentation_url.clone(),
                        reset_at: self.fetch_rate_limit_reset().await,
                    },
                )
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_reset(&self) -> Option<u64> {
        self.client
            .ratelimit()
            .get()
            .await
            .ok()
            .map(|limits| limits.rate.reset)
    }
}

#[async_trait]
impl CheckRunGateway for OctocrabCheckRunGateway {
    async fn list_check_runs_for_ref(
        &self,
        locator: &RepositoryLocator,
        sha: &CommitSha,
        page: u32,
    ) -> Result<CheckRunPage, WatchError> {
        if page == 0 {
            return Err(WatchError::Api {
                message: format!("{LIST_OPERATION}: page must be at least 1"),
            });
        }

        let uri: Uri = locator
            .check_runs_for_ref_path(sha, page, PER_PAGE)
            .parse::<Uri>()
            .map_err(|error| WatchError::InvalidUrl(error.to_string()))?;

        let response = self
            .client
            ._get_with_headers(uri, None)
            .await
            .map_err(|error| map_octocrab_error(LIST_OPERATION, &error))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(LIST_OPERATION, &error))?;

        if status != StatusCode::OK {
            return Err(map_http_error(
                LIST_OPERATION,
                status,
                error_detail(&headers, &body),
            ));
        }

        let list: ApiCheckRunList =
            serde_json::from_str(&body).map_err(|error| WatchError::Api {
                message: format!("{LIST_OPERATION} response deserialisation failed: {error}"),
            })?;

        Ok(CheckRunPage {
            check_runs: list.check_runs.into_iter().map(CheckRun::from).collect(),
            total_count: list.total_count,
            next_page: next_page(&headers),
        })
    }

    async fn check_run(
        &self,
        locator: &RepositoryLocator,
        id: CheckRunId,
    ) -> Result<CheckRun, WatchError> {
        match self
            .client
            .get::<ApiCheckRun, _, _>(locator.check_run_path(id), None::<&()>)
            .await
        {
            Ok(api) => Ok(api.into()),
            Err(error) => Err(self
                .map_octocrab_error_with_rate_limit(GET_OPERATION, &error)
                .await),
        }
    }
}
