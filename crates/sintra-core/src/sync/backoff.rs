use std::time::Duration;

/// Capped exponential delay applied after consecutive failed refreshes.
///
/// The n-th consecutive failure waits `interval * 2^n`, never more than `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    cap: Duration,
}

impl Backoff {
    pub fn capped(cap: Duration) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> Duration {
        self.cap
    }

    pub fn delay(&self, interval: Duration, consecutive_failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(consecutive_failures);
        interval.saturating_mul(factor).min(self.cap)
    }
}

/// Delay before the next refresh given the failure streak so far.
pub(crate) fn next_delay(
    interval: Duration,
    backoff: Option<Backoff>,
    consecutive_failures: u32,
) -> Duration {
    match backoff {
        Some(backoff) => backoff.delay(interval, consecutive_failures),
        None => interval,
    }
}
