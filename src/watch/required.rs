//! Allow-list of check names the caller wants watched.

use std::collections::HashSet;

/// Normalised set of required check names.
///
/// An empty set means no filtering was requested and every check matches.
/// Blank entries are discarded while parsing, so an empty or whitespace-only
/// list also yields the match-everything set.
///
/// # Example
///
/// ```
/// use checkwatch::watch::RequiredChecks;
///
/// let required = RequiredChecks::parse("build, lint ,test");
/// assert!(required.matches("lint"));
/// assert!(!required.matches("deploy"));
/// assert!(RequiredChecks::parse("").matches("deploy"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredChecks {
    names: HashSet<String>,
}

impl RequiredChecks {
    /// Splits `raw` on commas and trims every entry.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let names = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { names }
    }

    /// Returns true when no filtering applies or `name` is required.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }

    /// Number of distinct required names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when no names were supplied, so every check is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
