use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::backoff::Backoff;
use crate::api::ApiError;
use crate::config::RefreshConfig;
use crate::resources::Resource;

/// Converts a raw payload into the value a view holds.
pub type ParseFn<T> = Arc<dyn Fn(Value) -> Result<T, ApiError> + Send + Sync>;

/// Configuration for a [`super::PolledResource`].
///
/// ```rust,no_run
/// use std::time::Duration;
/// use sintra_core::resources::Agent;
/// use sintra_core::sync::SyncOptions;
///
/// let options = SyncOptions::<Vec<Agent>>::new()
///     .interval(Duration::from_secs(5))
///     .fallback(Vec::new());
/// ```
pub struct SyncOptions<T> {
    pub(crate) interval: Option<Duration>,
    pub(crate) parse: ParseFn<T>,
    pub(crate) fallback: Option<T>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) backoff: Option<Backoff>,
}

impl<T: Resource> SyncOptions<T> {
    /// Options that parse with [`Resource::parse`]; for `serde_json::Value`
    /// this is the identity.
    pub fn new() -> Self {
        Self::with_parse(T::parse)
    }
}

impl<T: Resource> Default for SyncOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncOptions<T> {
    /// Options with a custom parse step and nothing else set.
    pub fn with_parse<F>(parse: F) -> Self
    where
        F: Fn(Value) -> Result<T, ApiError> + Send + Sync + 'static,
    {
        Self {
            interval: None,
            parse: Arc::new(parse),
            fallback: None,
            timeout: None,
            backoff: None,
        }
    }

    /// Re-fetch `interval` after each fetch settles.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Substitute `fallback` when a fetch fails instead of reporting an error.
    pub fn fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Abandon a fetch that has not answered within `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Apply the interval and optional backoff cap from configuration.
    pub fn polling(mut self, config: &RefreshConfig) -> Self {
        self.interval = Some(config.interval());
        self.backoff = config.backoff_cap().map(Backoff::capped);
        self
    }
}

impl<T> fmt::Debug for SyncOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("interval", &self.interval)
            .field("has_fallback", &self.fallback.is_some())
            .field("timeout", &self.timeout)
            .field("backoff", &self.backoff)
            .finish()
    }
}
