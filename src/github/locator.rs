//! Identity wrappers and URL derivation for the watched repository.

use std::fmt;

use url::Url;

use crate::error::WatchError;

const GITHUB_COM_API: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    fn new(value: &str, slug: &str) -> Result<Self, WatchError> {
        if value.is_empty() {
            return Err(WatchError::InvalidRepository {
                value: slug.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    fn new(value: &str, slug: &str) -> Result<Self, WatchError> {
        if value.is_empty() || value.contains('/') {
            return Err(WatchError::InvalidRepository {
                value: slug.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, WatchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WatchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Commit reference whose check runs are watched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    /// Trims the value and rejects blank references.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidCommitSha` when the value is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, WatchError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WatchError::InvalidCommitSha);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the commit reference.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Check run identifier assigned by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckRunId(u64);

impl CheckRunId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CheckRunId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Derives the GitHub API base URL from a web host.
///
/// `github.com` maps to the public API host; any other host is treated as
/// GitHub Enterprise Server and served under `/api/v3`.
fn derive_api_base(web_base: &Url) -> Result<Url, WatchError> {
    let host = web_base
        .host_str()
        .ok_or_else(|| WatchError::InvalidUrl("server URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return parse_url(GITHUB_COM_API);
    }

    let authority = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = parse_url(&format!("{}://{authority}", web_base.scheme()))?;
    api_url
        .set_port(web_base.port())
        .map_err(|()| WatchError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

fn parse_url(input: &str) -> Result<Url, WatchError> {
    Url::parse(input).map_err(|error| WatchError::InvalidUrl(format!("{input}: {error}")))
}

/// Repository coordinates with the web and API bases they live under.
///
/// # Example
///
/// ```
/// use checkwatch::github::locator::{CommitSha, RepositoryLocator};
///
/// let locator = RepositoryLocator::from_slug("octo/widgets", "https://github.com")
///     .expect("should parse repository slug");
/// let sha = CommitSha::new("abc123").expect("sha should be valid");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// assert_eq!(
///     locator.commit_url(&sha),
///     "https://github.com/octo/widgets/commit/abc123"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    web_base: Url,
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Parses an `owner/name` slug hosted on `server_url`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidRepository` when the slug is not
    /// `owner/name`, or `WatchError::InvalidUrl` when the server URL cannot
    /// be parsed.
    pub fn from_slug(slug: &str, server_url: &str) -> Result<Self, WatchError> {
        let trimmed = slug.trim();
        let (owner_part, name_part) =
            trimmed
                .split_once('/')
                .ok_or_else(|| WatchError::InvalidRepository {
                    value: trimmed.to_owned(),
                })?;

        let owner = RepositoryOwner::new(owner_part, trimmed)?;
        let repository = RepositoryName::new(name_part, trimmed)?;
        let web_base = parse_url(server_url.trim())?;
        let api_base = derive_api_base(&web_base)?;

        Ok(Self {
            web_base,
            api_base,
            owner,
            repository,
        })
    }

    /// Replaces the derived API base with an explicit one.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when `api_url` cannot be parsed.
    pub fn with_api_base(mut self, api_url: &str) -> Result<Self, WatchError> {
        self.api_base = parse_url(api_url.trim())?;
        Ok(self)
    }

    /// API base URL used for REST calls.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Web base URL used for human-facing links.
    #[must_use]
    pub const fn web_base(&self) -> &Url {
        &self.web_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Link to the commit page shown in notifications.
    #[must_use]
    pub fn commit_url(&self, sha: &CommitSha) -> String {
        format!(
            "{}/{}/{}/commit/{}",
            self.web_base.as_str().trim_end_matches('/'),
            self.owner.as_str(),
            self.repository.as_str(),
            sha.as_str()
        )
    }

    pub(crate) fn check_runs_for_ref_path(&self, sha: &CommitSha, page: u32, per_page: u8) -> String {
        format!(
            "/repos/{}/{}/commits/{}/check-runs?per_page={per_page}&page={page}",
            self.owner.as_str(),
            self.repository.as_str(),
            sha.as_str()
        )
    }

    pub(crate) fn check_run_path(&self, id: CheckRunId) -> String {
        format!(
            "/repos/{}/{}/check-runs/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            id.get()
        )
    }
}
