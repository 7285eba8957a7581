use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::warn;

use crate::classify::Verdict;

use super::histogram::LatencyHistogram;

/// The recorded result of executing one work item. Produced by the executor,
/// owned thereafter by the collector; immutable once produced.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub target_id: Arc<str>,
    pub seq: u64,
    /// Wall-clock dispatch time, used only for exported detail rows.
    pub wall_time: DateTime<Utc>,
    /// Monotonic dispatch timestamp.
    pub started_at: Instant,
    /// Time spent strictly inside the network call: connection establishment
    /// through full body receipt. Queue wait, parsing, and recording are
    /// excluded.
    pub elapsed: Duration,
    /// HTTP status; absent on transport failure.
    pub status: Option<u16>,
    /// Response body size in bytes; absent on transport failure.
    pub body_bytes: Option<u64>,
    pub verdict: Verdict,
    /// Whether the response body was fully drained before the connection was
    /// released.
    pub drained: bool,
}

impl RequestOutcome {
    #[must_use]
    pub fn completed_at(&self) -> Instant {
        self.started_at
            .checked_add(self.elapsed)
            .unwrap_or(self.started_at)
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Running per-target counters and sums. Mutated exclusively by the
/// collector task as outcomes arrive; finalized (read-only) once all work
/// for the run completes.
#[derive(Debug)]
pub struct TargetAggregate {
    pub target_id: Arc<str>,
    pub total: u64,
    pub successes: u64,
    /// Failure counts keyed by reason code.
    pub failures: BTreeMap<String, u64>,
    pub success_latency_sum: Duration,
    pub success_bytes_sum: u64,
    pub first_dispatch: Option<Instant>,
    pub last_completion: Option<Instant>,
    /// Successful-request latencies; drives the summary percentiles.
    pub histogram: Option<LatencyHistogram>,
}

impl TargetAggregate {
    #[must_use]
    pub fn new(target_id: Arc<str>) -> Self {
        Self {
            target_id,
            total: 0,
            successes: 0,
            failures: BTreeMap::new(),
            success_latency_sum: Duration::ZERO,
            success_bytes_sum: 0,
            first_dispatch: None,
            last_completion: None,
            histogram: LatencyHistogram::new()
                .map_err(|err| warn!("Latency histogram disabled: {}", err))
                .ok(),
        }
    }

    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.total = self.total.saturating_add(1);

        match outcome.verdict.failure_reason() {
            None => {
                self.successes = self.successes.saturating_add(1);
                self.success_latency_sum = self
                    .success_latency_sum
                    .checked_add(outcome.elapsed)
                    .unwrap_or(Duration::MAX);
                self.success_bytes_sum = self
                    .success_bytes_sum
                    .saturating_add(outcome.body_bytes.unwrap_or(0));
                if let Some(histogram) = self.histogram.as_mut()
                    && let Err(err) = histogram.record(outcome.elapsed_ms())
                {
                    warn!("Failed to record latency sample: {}", err);
                }
            }
            Some(reason) => {
                let count = self.failures.entry(reason.code()).or_insert(0);
                *count = count.saturating_add(1);
            }
        }

        let dispatched = outcome.started_at;
        self.first_dispatch = Some(
            self.first_dispatch
                .map_or(dispatched, |first| first.min(dispatched)),
        );
        let completed = outcome.completed_at();
        self.last_completion = Some(
            self.last_completion
                .map_or(completed, |last| last.max(completed)),
        );
    }

    /// Span between this target's first dispatch and last completion.
    #[must_use]
    pub fn span(&self) -> Duration {
        match (self.first_dispatch, self.last_completion) {
            (Some(first), Some(last)) => last.saturating_duration_since(first),
            _ => Duration::ZERO,
        }
    }
}

/// Finalized, read-only per-target statistics line.
///
/// Zero-division convention: every derived mean and rate reports 0 when its
/// denominator is 0. A zero-success target is valid output, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub target_id: Arc<str>,
    pub total: u64,
    pub successes: u64,
    pub failures: BTreeMap<String, u64>,
    /// Success percentage, fixed-point with two decimals (6667 = 66.67%).
    pub success_rate_x100: u64,
    /// Mean time per request over the target's span, in milliseconds.
    pub rate_ms_per_request: u64,
    pub mean_success_latency_ms: u64,
    pub mean_success_bytes: u64,
    /// First dispatch to last completion for this target, in milliseconds.
    pub span_ms: u64,
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
}

/// Division rounded to the nearest integer; 0 when the divisor is 0.
fn div_rounded(numerator: u64, divisor: u64) -> u64 {
    let half = divisor.checked_div(2).unwrap_or(0);
    numerator
        .saturating_add(half)
        .checked_div(divisor)
        .unwrap_or(0)
}

impl SummaryRow {
    /// Derive the summary projection of a finalized aggregate. Pure and
    /// idempotent: the same aggregate always yields an identical row.
    #[must_use]
    pub fn from_aggregate(aggregate: &TargetAggregate) -> Self {
        let span_ms = u64::try_from(aggregate.span().as_millis()).unwrap_or(u64::MAX);
        let success_latency_ms =
            u64::try_from(aggregate.success_latency_sum.as_millis()).unwrap_or(u64::MAX);

        let success_rate_x100 = div_rounded(
            aggregate.successes.saturating_mul(10_000),
            aggregate.total,
        );
        let rate_ms_per_request = span_ms.checked_div(aggregate.total).unwrap_or(0);
        let mean_success_latency_ms = success_latency_ms
            .checked_div(aggregate.successes)
            .unwrap_or(0);
        let mean_success_bytes = aggregate
            .success_bytes_sum
            .checked_div(aggregate.successes)
            .unwrap_or(0);
        let (p50_ms, p90_ms, p99_ms) = aggregate
            .histogram
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles);

        Self {
            target_id: aggregate.target_id.clone(),
            total: aggregate.total,
            successes: aggregate.successes,
            failures: aggregate.failures.clone(),
            success_rate_x100,
            rate_ms_per_request,
            mean_success_latency_ms,
            mean_success_bytes,
            span_ms,
            p50_ms,
            p90_ms,
            p99_ms,
        }
    }
}
