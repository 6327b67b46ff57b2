//! The polled resource handle and its fetch cycle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backoff::next_delay;
use super::fetcher::ResourceFetcher;
use super::options::SyncOptions;
use super::state::{SyncOutcome, SyncState};
use crate::api::{ApiError, Endpoint};
use crate::errors::SintraError;

type InFlight = Shared<BoxFuture<'static, SyncOutcome>>;

/// Keeps one remote resource fresh for a view.
///
/// Created with [`PolledResource::start`], which fetches immediately and, if
/// an interval is configured, again `interval` after every settled fetch.
/// The handle owns the polling timer: [`PolledResource::stop`] or dropping
/// the handle cancels it, and any fetch still outstanding at that moment is
/// allowed to finish without touching the state.
///
/// Must be started from within a tokio runtime.
pub struct PolledResource<T> {
    inner: Arc<SyncInner<T>>,
    driver: JoinHandle<()>,
}

struct SyncInner<T> {
    endpoint: Endpoint,
    fetcher: Arc<dyn ResourceFetcher>,
    options: SyncOptions<T>,
    state: watch::Sender<SyncState<T>>,
    cancel: CancellationToken,
    in_flight: Mutex<Option<InFlight>>,
}

impl<T> PolledResource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Begin syncing `endpoint`.
    pub fn start(
        fetcher: Arc<dyn ResourceFetcher>,
        endpoint: Endpoint,
        options: SyncOptions<T>,
    ) -> Self {
        info!(
            event = "core.sync.started",
            endpoint = %endpoint,
            interval_ms = options.interval.map(millis),
            backoff_cap_ms = options.backoff.map(|b| millis(b.cap())),
            has_fallback = options.fallback.is_some()
        );

        let (state, _) = watch::channel(SyncState::idle());
        let inner = Arc::new(SyncInner {
            endpoint,
            fetcher,
            options,
            state,
            cancel: CancellationToken::new(),
            in_flight: Mutex::new(None),
        });

        let driver = tokio::spawn(drive(Arc::clone(&inner)));
        Self { inner, driver }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SyncState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SyncState<T>> {
        self.inner.state.subscribe()
    }

    /// Wait until the state is `Ready` or `Failed`, then return it.
    ///
    /// Returns the current state as-is if the sync is stopped first.
    pub async fn settled(&self) -> SyncState<T> {
        let mut rx = self.inner.state.subscribe();
        loop {
            {
                let current = rx.borrow_and_update();
                if current.is_settled() {
                    return current.clone();
                }
            }
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = self.inner.cancel.cancelled() => break,
            }
        }
        self.state()
    }

    /// Fetch now instead of waiting for the next tick.
    ///
    /// If a fetch is already outstanding no new request is made; the caller
    /// receives that fetch's outcome.
    pub async fn refresh_now(&self) -> SyncOutcome {
        self.inner.refresh().await
    }

    /// Cancel polling. Idempotent.
    ///
    /// After this returns, the state never changes again.
    pub fn stop(&self) {
        let cancel = &self.inner.cancel;
        if cancel.is_cancelled() {
            return;
        }
        // Cancelling under the state lock orders it against in-progress commits.
        self.inner.state.send_if_modified(|_| {
            cancel.cancel();
            false
        });
        debug!(event = "core.sync.stopped", endpoint = %self.inner.endpoint);
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl<T> Drop for PolledResource<T> {
    fn drop(&mut self) {
        let cancel = &self.inner.cancel;
        self.inner.state.send_if_modified(|_| {
            cancel.cancel();
            false
        });
        // The driver only sleeps or awaits the shared fetch task, which
        // finishes on its own.
        self.driver.abort();
    }
}

impl<T> SyncInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Join the outstanding fetch, or start one.
    fn refresh(self: &Arc<Self>) -> InFlight {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = slot.as_ref() {
            debug!(event = "core.sync.refresh_joined", endpoint = %self.endpoint);
            return existing.clone();
        }

        if self.cancel.is_cancelled() {
            return futures::future::ready(SyncOutcome::Cancelled)
                .boxed()
                .shared();
        }

        let inner = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = Arc::clone(&inner).run_cycle().await;
            inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            outcome
        });

        let shared = async move {
            task.await.unwrap_or_else(|e| SyncOutcome::Failed {
                message: format!("fetch task ended unexpectedly: {}", e),
            })
        }
        .boxed()
        .shared();

        *slot = Some(shared.clone());
        shared
    }

    /// One request, one settle. Results are dropped if the sync was stopped.
    async fn run_cycle(self: Arc<Self>) -> SyncOutcome {
        if !self.commit(|state| state.begin_loading()) {
            return SyncOutcome::Cancelled;
        }
        debug!(event = "core.sync.fetch_started", endpoint = %self.endpoint);

        let fetched = match self.options.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.fetcher.fetch(&self.endpoint)).await {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::Timeout {
                        url: self.endpoint.to_string(),
                        timeout_ms: millis(limit),
                    }),
                }
            }
            None => self.fetcher.fetch(&self.endpoint).await,
        };
        let parsed = fetched.and_then(|raw| (self.options.parse)(raw));

        let outcome = match parsed {
            Ok(data) => {
                let fetched_at = Utc::now();
                if self.commit(|state| state.settle_ready(data, fetched_at)) {
                    debug!(event = "core.sync.fetch_completed", endpoint = %self.endpoint);
                    SyncOutcome::Ready
                } else {
                    SyncOutcome::Cancelled
                }
            }
            Err(error) => self.settle_error(error),
        };

        if outcome == SyncOutcome::Cancelled {
            debug!(event = "core.sync.result_discarded", endpoint = %self.endpoint);
        }
        outcome
    }

    fn settle_error(&self, error: ApiError) -> SyncOutcome {
        warn!(
            event = "core.sync.fetch_failed",
            endpoint = %self.endpoint,
            error = %error,
            error_code = error.error_code(),
            fallback = self.options.fallback.is_some()
        );

        match &self.options.fallback {
            Some(fallback) => {
                let fallback = fallback.clone();
                if self.commit(|state| state.settle_fallback(fallback)) {
                    SyncOutcome::Fallback
                } else {
                    SyncOutcome::Cancelled
                }
            }
            None => {
                let message = error.user_message();
                if self.commit(|state| state.settle_failed(message.clone())) {
                    SyncOutcome::Failed { message }
                } else {
                    SyncOutcome::Cancelled
                }
            }
        }
    }

    /// Apply a transition unless the sync has been stopped.
    fn commit(&self, transition: impl FnOnce(&mut SyncState<T>)) -> bool {
        let cancel = &self.cancel;
        self.state.send_if_modified(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            transition(state);
            true
        })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Polling loop: fetch, wait for the (possibly backed-off) interval, repeat.
async fn drive<T>(inner: Arc<SyncInner<T>>)
where
    T: Clone + Send + Sync + 'static,
{
    let mut consecutive_failures: u32 = 0;

    loop {
        let outcome = inner.refresh().await;
        if outcome == SyncOutcome::Cancelled {
            break;
        }
        if outcome.is_failure() {
            consecutive_failures = consecutive_failures.saturating_add(1);
        } else {
            consecutive_failures = 0;
        }

        let Some(interval) = inner.options.interval else {
            break;
        };
        let delay = next_delay(interval, inner.options.backoff, consecutive_failures);
        if delay != interval {
            debug!(
                event = "core.sync.backoff_applied",
                endpoint = %inner.endpoint,
                delay_ms = millis(delay),
                consecutive_failures = consecutive_failures
            );
        }

        tokio::select! {
            _ = inner.cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(event = "core.sync.driver_finished", endpoint = %inner.endpoint);
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tokio::sync::Semaphore;

    use super::*;
    use crate::sync::{Backoff, SyncStatus};

    /// Answers from a script, one entry per call. Each call first takes a
    /// permit from `gate`, so tests decide when a response "arrives".
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<Value, ApiError>>>,
        calls: AtomicUsize,
        gate: Arc<Semaphore>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Result<Value, ApiError>>) -> Arc<Self> {
            Self::gated(responses, Semaphore::MAX_PERMITS)
        }

        fn gated(responses: Vec<Result<Value, ApiError>>, permits: usize) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                gate: Arc::new(Semaphore::new(permits)),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn release(&self, responses: usize) {
            self.gate.add_permits(responses);
        }
    }

    #[async_trait]
    impl ResourceFetcher for ScriptedFetcher {
        async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(server_error(endpoint)))
        }
    }

    fn server_error(endpoint: &Endpoint) -> ApiError {
        ApiError::Status {
            url: endpoint.to_string(),
            status: 500,
            detail: None,
        }
    }

    fn tasks_endpoint() -> Endpoint {
        Endpoint::new(["tasks"])
    }

    async fn wait_for_calls(fetcher: &ScriptedFetcher, calls: usize) {
        while fetcher.calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_until<T, F>(sync: &PolledResource<T>, predicate: F) -> SyncState<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&SyncState<T>) -> bool,
    {
        let mut rx = sync.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(120), async {
            loop {
                {
                    let current = rx.borrow_and_update();
                    if predicate(&current) {
                        return current.clone();
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("state never matched");
        state
    }

    #[tokio::test]
    async fn test_first_fetch_settles_ready() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!(["t1"]))]);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());

        let state = sync.settled().await;
        assert_eq!(state.status, SyncStatus::Ready);
        assert_eq!(state.data, Some(json!(["t1"])));
        assert_eq!(state.error, None);
        assert!(state.last_fetched_at.is_some());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_loading_keeps_previous_data() {
        let fetcher = ScriptedFetcher::gated(vec![Ok(json!(["a"])), Ok(json!(["a", "b"]))], 1);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        sync.settled().await;

        let (outcome, observed) = tokio::join!(sync.refresh_now(), async {
            wait_for_calls(&fetcher, 2).await;
            let during = sync.state();
            fetcher.release(1);
            during
        });

        assert_eq!(observed.status, SyncStatus::Loading);
        assert_eq!(observed.data, Some(json!(["a"])));
        assert_eq!(outcome, SyncOutcome::Ready);
        assert_eq!(sync.state().data, Some(json!(["a", "b"])));
    }

    #[tokio::test]
    async fn test_refresh_while_loading_joins_in_flight_fetch() {
        let fetcher = ScriptedFetcher::gated(vec![Ok(json!({"status": "ok"}))], 0);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        wait_for_calls(&fetcher, 1).await;
        assert_eq!(sync.state().status, SyncStatus::Loading);

        let (first, second) = tokio::join!(sync.refresh_now(), async {
            let outcome = sync.refresh_now();
            fetcher.release(1);
            outcome.await
        });

        assert_eq!(first, SyncOutcome::Ready);
        assert_eq!(second, SyncOutcome::Ready);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_stop_discards_outstanding_result() {
        let fetcher = ScriptedFetcher::gated(vec![Ok(json!(["t1"])), Ok(json!(["late"]))], 1);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        sync.settled().await;

        let (at_stop, refresh_outcome) = tokio::join!(
            async {
                wait_for_calls(&fetcher, 2).await;
                let at_stop = sync.state();
                sync.stop();
                fetcher.release(1);
                at_stop
            },
            sync.refresh_now()
        );

        assert_eq!(refresh_outcome, SyncOutcome::Cancelled);
        let after = sync.state();
        assert_eq!(after, at_stop);
        assert_eq!(after.status, SyncStatus::Loading);
        assert_eq!(after.data, Some(json!(["t1"])));
        assert!(sync.is_stopped());
    }

    #[tokio::test]
    async fn test_late_response_after_stop_changes_nothing() {
        let fetcher = ScriptedFetcher::gated(vec![Ok(json!(["late"]))], 0);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        wait_for_calls(&fetcher, 1).await;

        let at_stop = sync.state();
        let mut rx = sync.subscribe();
        rx.borrow_and_update();
        sync.stop();
        fetcher.release(1);

        // Joining the outstanding fetch waits for it to finish.
        assert_eq!(sync.refresh_now().await, SyncOutcome::Cancelled);
        assert_eq!(sync.state(), at_stop);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_after_stop_issues_no_request() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!([]))]);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        sync.settled().await;
        sync.stop();

        assert_eq!(sync.refresh_now().await, SyncOutcome::Cancelled);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_surfaces_error() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());

        let state = sync.settled().await;
        assert_eq!(state.status, SyncStatus::Failed);
        assert_eq!(state.data, None);
        assert_eq!(
            state.error.as_deref(),
            Some("The server returned an error (HTTP 500)")
        );
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_data() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(json!(["t1"])),
            Err(ApiError::Status {
                url: "http://localhost:8000/api/tasks".to_string(),
                status: 503,
                detail: Some("maintenance".to_string()),
            }),
        ]);
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), SyncOptions::<Value>::new());
        sync.settled().await;

        let outcome = sync.refresh_now().await;
        assert_eq!(
            outcome,
            SyncOutcome::Failed {
                message: "maintenance".to_string()
            }
        );
        let state = sync.state();
        assert_eq!(state.status, SyncStatus::Failed);
        assert_eq!(state.data, Some(json!(["t1"])));
    }

    #[tokio::test]
    async fn test_fallback_suppresses_error() {
        let fallback = json!([{"id": "soshie"}]);
        let fetcher = ScriptedFetcher::new(vec![]);
        let sync = PolledResource::start(
            fetcher.clone(),
            Endpoint::new(["agents"]),
            SyncOptions::<Value>::new().fallback(fallback.clone()),
        );

        let state = sync.settled().await;
        assert_eq!(state.status, SyncStatus::Ready);
        assert_eq!(state.data, Some(fallback));
        assert_eq!(state.error, None);
        assert_eq!(state.last_fetched_at, None);
    }

    #[tokio::test]
    async fn test_parse_failure_is_normalized() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"unexpected": true}))]);
        let options = SyncOptions::with_parse(|raw| crate::resources::parse_collection::<String>(raw, "tasks"));
        let sync = PolledResource::start(fetcher.clone(), tasks_endpoint(), options);

        let state = sync.settled().await;
        assert_eq!(state.status, SyncStatus::Failed);
        assert_eq!(state.data, None);
        assert_eq!(
            state.error.as_deref(),
            Some("The server sent an unexpected response")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_picks_up_new_items() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!(["t1"])), Ok(json!(["t1", "t2"]))]);
        let sync = PolledResource::start(
            fetcher.clone(),
            tasks_endpoint(),
            SyncOptions::<Value>::new().interval(Duration::from_millis(5000)),
        );

        let first = sync.settled().await;
        assert_eq!(first.data, Some(json!(["t1"])));

        let second = wait_until(&sync, |s| s.data == Some(json!(["t1", "t2"]))).await;
        assert_eq!(second.status, SyncStatus::Ready);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_the_cycle() {
        let fetcher = ScriptedFetcher::gated(vec![Ok(json!([]))], 0);
        let sync = PolledResource::start(
            fetcher.clone(),
            tasks_endpoint(),
            SyncOptions::<Value>::new().timeout(Duration::from_secs(2)),
        );

        let state = sync.settled().await;
        assert_eq!(state.status, SyncStatus::Failed);
        assert_eq!(
            state.error.as_deref(),
            Some("The server took too long to respond")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_spaces_out_failed_refreshes() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let started = tokio::time::Instant::now();
        let sync = PolledResource::start(
            fetcher.clone(),
            tasks_endpoint(),
            SyncOptions::<Value>::new()
                .interval(Duration::from_secs(5))
                .backoff(Backoff::capped(Duration::from_secs(15))),
        );

        // Failures at t=0, then after 10s (2^1 * 5) and 15s (capped).
        while fetcher.calls() < 3 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(started.elapsed() >= Duration::from_secs(25));
        drop(sync);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!([]))]);
        let sync = PolledResource::start(
            fetcher.clone(),
            tasks_endpoint(),
            SyncOptions::<Value>::new().interval(Duration::from_millis(10)),
        );
        sync.settled().await;
        drop(sync);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetcher.calls(), 1);
    }
}
