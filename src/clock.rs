use std::time::Duration;

use tokio::time::Instant;

/// Monotonic clock used for every latency measurement.
///
/// Wall-clock time (`chrono`) appears only in exported row timestamps and
/// dated output folder names; it never feeds a latency figure, so system
/// clock adjustments cannot skew a measurement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock;

impl Clock {
    #[must_use]
    pub fn now(self) -> Instant {
        Instant::now()
    }

    #[must_use]
    pub fn elapsed_since(self, start: Instant) -> Duration {
        start.elapsed()
    }
}
