use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Fixed-interval dispatch gate.
///
/// Owns the single piece of rate-limiter state: the monotonic timestamp of
/// the last grant. `admit` suspends the caller until at least `period` has
/// passed since that grant, then advances it. Grants are serialized through
/// the mutex, so two callers can never take the same slot.
#[derive(Debug)]
pub struct IntervalGate {
    period: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl IntervalGate {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            last_grant: Mutex::const_new(None),
        }
    }

    /// Gate for a requests-per-second limit; `None` when the rate is 0
    /// (unlimited).
    #[must_use]
    pub fn from_rate(rate_per_sec: u64) -> Option<Self> {
        if rate_per_sec == 0 {
            return None;
        }
        let nanos = 1_000_000_000u64.checked_div(rate_per_sec).unwrap_or(0);
        if nanos == 0 {
            return None;
        }
        Some(Self::new(Duration::from_nanos(nanos)))
    }

    /// Wait for the next dispatch slot.
    pub async fn admit(&self) {
        let mut last = self.last_grant.lock().await;
        let now = Instant::now();
        let slot = (*last).map_or(now, |previous| {
            previous.checked_add(self.period).unwrap_or(now).max(now)
        });
        if slot > now {
            sleep_until(slot).await;
        }
        *last = Some(slot);
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}
