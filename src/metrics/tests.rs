use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use crate::classify::{FailureReason, TransportKind, Verdict};

use super::{CollectorConfig, RequestOutcome, SummaryRow, TargetAggregate, setup_collector};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn outcome(target: &str, seq: u64, elapsed_ms: u64, verdict: Verdict) -> RequestOutcome {
    RequestOutcome {
        target_id: Arc::from(target),
        seq,
        wall_time: chrono::Utc::now(),
        started_at: Instant::now(),
        elapsed: Duration::from_millis(elapsed_ms),
        status: Some(200),
        body_bytes: Some(2048),
        verdict,
        drained: true,
    }
}

fn timeout_failure() -> Verdict {
    Verdict::Failure(FailureReason::Transport {
        kind: TransportKind::Timeout,
        detail: "deadline exceeded".to_owned(),
    })
}

#[test]
fn aggregation_matches_known_values() -> Result<(), String> {
    let mut aggregate = TargetAggregate::new(Arc::from("google"));
    aggregate.record(&outcome("google", 0, 100, Verdict::Success));
    aggregate.record(&outcome("google", 1, 200, Verdict::Success));
    aggregate.record(&outcome("google", 2, 50, timeout_failure()));

    let row = SummaryRow::from_aggregate(&aggregate);
    if row.total != 3 || row.successes != 2 {
        return Err(format!("counts wrong: total {} successes {}", row.total, row.successes));
    }
    if row.success_rate_x100 != 6667 {
        return Err(format!("expected 66.67%, got x100 {}", row.success_rate_x100));
    }
    if row.mean_success_latency_ms != 150 {
        return Err(format!("expected mean 150ms, got {}", row.mean_success_latency_ms));
    }
    if row.mean_success_bytes != 2048 {
        return Err(format!("expected mean 2048 bytes, got {}", row.mean_success_bytes));
    }
    if row.failures.get("timeout") != Some(&1) {
        return Err(format!("timeout not counted: {:?}", row.failures));
    }
    Ok(())
}

#[test]
fn summary_is_idempotent() -> Result<(), String> {
    let mut aggregate = TargetAggregate::new(Arc::from("bing"));
    aggregate.record(&outcome("bing", 0, 120, Verdict::Success));
    aggregate.record(&outcome("bing", 1, 80, timeout_failure()));

    let first = SummaryRow::from_aggregate(&aggregate);
    let second = SummaryRow::from_aggregate(&aggregate);
    if first != second {
        return Err(format!("rows differ: {:?} vs {:?}", first, second));
    }
    Ok(())
}

#[test]
fn zero_successes_report_zeroed_means() -> Result<(), String> {
    let mut aggregate = TargetAggregate::new(Arc::from("yahoo"));
    aggregate.record(&outcome("yahoo", 0, 40, timeout_failure()));
    aggregate.record(&outcome("yahoo", 1, 60, timeout_failure()));

    let row = SummaryRow::from_aggregate(&aggregate);
    if row.success_rate_x100 != 0 {
        return Err(format!("expected 0%, got x100 {}", row.success_rate_x100));
    }
    if row.mean_success_latency_ms != 0 || row.mean_success_bytes != 0 {
        return Err("zero-success means should be 0".to_owned());
    }
    if row.p50_ms != 0 {
        return Err(format!("empty histogram should report 0, got {}", row.p50_ms));
    }
    Ok(())
}

#[test]
fn empty_aggregate_reports_all_zero() -> Result<(), String> {
    let aggregate = TargetAggregate::new(Arc::from("naver"));
    let row = SummaryRow::from_aggregate(&aggregate);
    if row.total != 0
        || row.success_rate_x100 != 0
        || row.rate_ms_per_request != 0
        || row.span_ms != 0
    {
        return Err(format!("expected zeroed row, got {:?}", row));
    }
    Ok(())
}

#[test]
fn collector_records_every_outcome_exactly_once() -> Result<(), String> {
    run_async_test(async {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let completed = Arc::new(AtomicU64::new(0));
        let handle = setup_collector(
            rx,
            CollectorConfig {
                batch_size: 1000,
                detail_tx: None,
                completed: Arc::clone(&completed),
            },
        );

        for target in ["google", "bing", "yahoo"] {
            for seq in 0..5 {
                let verdict = if seq == 4 { timeout_failure() } else { Verdict::Success };
                tx.send(outcome(target, seq, 100, verdict))
                    .await
                    .map_err(|err| format!("send failed: {}", err))?;
            }
        }
        drop(tx);

        let report = handle.await.map_err(|err| format!("join failed: {}", err))?;
        if report.received != 15 {
            return Err(format!("expected 15 outcomes, got {}", report.received));
        }
        if completed.load(Ordering::Relaxed) != 15 {
            return Err("completed gauge out of sync".to_owned());
        }
        if report.aggregates.len() != 3 {
            return Err(format!("expected 3 aggregates, got {}", report.aggregates.len()));
        }
        for aggregate in &report.aggregates {
            if aggregate.total != 5 || aggregate.successes != 4 {
                return Err(format!(
                    "aggregate {} has total {} successes {}",
                    aggregate.target_id, aggregate.total, aggregate.successes
                ));
            }
        }
        Ok(())
    })
}

#[test]
fn detail_batches_flush_at_size_and_at_end() -> Result<(), String> {
    run_async_test(async {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let (batch_tx, mut batch_rx) = tokio::sync::mpsc::channel(16);
        let handle = setup_collector(
            rx,
            CollectorConfig {
                batch_size: 2,
                detail_tx: Some(batch_tx),
                completed: Arc::new(AtomicU64::new(0)),
            },
        );

        for seq in 0..5 {
            tx.send(outcome("google", seq, 10, Verdict::Success))
                .await
                .map_err(|err| format!("send failed: {}", err))?;
        }
        drop(tx);
        handle.await.map_err(|err| format!("join failed: {}", err))?;

        let mut sizes = Vec::new();
        while let Some(batch) = batch_rx.recv().await {
            sizes.push(batch.len());
        }
        if sizes != [2, 2, 1] {
            return Err(format!("unexpected batch sizes: {:?}", sizes));
        }
        Ok(())
    })
}

#[test]
fn target_span_covers_first_dispatch_to_last_completion() -> Result<(), String> {
    let mut aggregate = TargetAggregate::new(Arc::from("google"));
    let base = Instant::now();
    let mut first = outcome("google", 0, 100, Verdict::Success);
    first.started_at = base;
    let mut second = outcome("google", 1, 300, Verdict::Success);
    second.started_at = base
        .checked_add(Duration::from_millis(50))
        .ok_or("instant overflow")?;
    aggregate.record(&second);
    aggregate.record(&first);

    // 50ms offset + 300ms elapsed, regardless of arrival order.
    if aggregate.span() != Duration::from_millis(350) {
        return Err(format!("unexpected span: {:?}", aggregate.span()));
    }
    Ok(())
}
