//! Timing knobs for the settle delay and the poll loop.

use std::time::Duration;

/// Grace period before discovery so GitHub can register every check.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// Interval between two status queries of the same check.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timing used by a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchTiming {
    /// Wait before the first discovery fetch.
    pub settle_delay: Duration,
    /// Wait between status queries of one check.
    pub poll_interval: Duration,
    /// Longest a single check may be polled; `None` polls until completion.
    pub max_wait: Option<Duration>,
}

impl WatchTiming {
    /// Sets the per-check maximum wait.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

impl Default for WatchTiming {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}
