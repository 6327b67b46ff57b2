use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of a synced resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What a view renders for one remote resource.
///
/// `data` always holds the last good value: it is never cleared while a
/// refresh is loading or after a failed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState<T> {
    pub data: Option<T>,
    pub status: SyncStatus,
    pub error: Option<String>,
    /// Time of the last successful fetch. Fallback substitutions leave it untouched.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T> SyncState<T> {
    pub fn idle() -> Self {
        Self {
            data: None,
            status: SyncStatus::Idle,
            error: None,
            last_fetched_at: None,
        }
    }

    /// Whether the latest fetch has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, SyncStatus::Ready | SyncStatus::Failed)
    }

    pub(crate) fn begin_loading(&mut self) {
        self.status = SyncStatus::Loading;
    }

    pub(crate) fn settle_ready(&mut self, data: T, fetched_at: DateTime<Utc>) {
        self.data = Some(data);
        self.status = SyncStatus::Ready;
        self.error = None;
        self.last_fetched_at = Some(fetched_at);
    }

    pub(crate) fn settle_fallback(&mut self, fallback: T) {
        self.data = Some(fallback);
        self.status = SyncStatus::Ready;
        self.error = None;
    }

    pub(crate) fn settle_failed(&mut self, message: String) {
        self.status = SyncStatus::Failed;
        self.error = Some(message);
    }
}

impl<T> Default for SyncState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

/// How a single fetch cycle ended, as seen by whoever awaited it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh data was stored.
    Ready,
    /// The fetch failed and the configured fallback was stored instead.
    Fallback,
    /// The fetch failed; the message was stored as the state's error.
    Failed { message: String },
    /// The sync was stopped; nothing was stored.
    Cancelled,
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Fallback | SyncOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_keeps_last_good_data() {
        let mut state = SyncState::idle();
        state.settle_ready(vec![1, 2], Utc::now());
        state.begin_loading();

        assert_eq!(state.status, SyncStatus::Loading);
        assert_eq!(state.data, Some(vec![1, 2]));
        assert!(!state.is_settled());
    }

    #[test]
    fn test_failure_keeps_data_and_sets_error() {
        let mut state = SyncState::idle();
        let fetched_at = Utc::now();
        state.settle_ready("tasks", fetched_at);
        state.begin_loading();
        state.settle_failed("Unable to reach the server".to_string());

        assert_eq!(state.status, SyncStatus::Failed);
        assert_eq!(state.data, Some("tasks"));
        assert_eq!(state.error.as_deref(), Some("Unable to reach the server"));
        assert_eq!(state.last_fetched_at, Some(fetched_at));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut state = SyncState::idle();
        state.settle_failed("boom".to_string());
        state.settle_ready(3, Utc::now());

        assert_eq!(state.status, SyncStatus::Ready);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_fallback_does_not_touch_timestamp() {
        let mut state = SyncState::idle();
        state.settle_fallback(vec!["roster"]);

        assert_eq!(state.status, SyncStatus::Ready);
        assert_eq!(state.last_fetched_at, None);
        assert_eq!(state.error, None);
    }
}
