//! In-memory notifier for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{NotificationEvent, Notifier};

/// Notifier that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    /// Returns a copy of the events recorded so far, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the names of the notified checks, sorted for stable asserts.
    #[must_use]
    pub fn notified_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events().into_iter().map(|event| event.name).collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &NotificationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
