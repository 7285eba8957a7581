use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::ProbeArgs;
use crate::clock::Clock;
use crate::config::resolve_targets;
use crate::error::AppResult;
use crate::http::{
    ClientSet, ConnectionPolicy, DispatchConfig, IntervalGate, expand_work, run_dispatcher,
};
use crate::metrics::{CollectorConfig, SummaryRow, setup_collector};
use crate::sinks::{
    DETAIL_FILE, SUMMARY_FILE, ensure_output_dir, resolve_output_dir, setup_detail_writer,
    summary_table_lines, write_summary_csv,
};

use super::progress::spawn_monitor;

const OUTCOME_CHANNEL_CAPACITY: usize = 1024;
const BATCH_CHANNEL_CAPACITY: usize = 8;

/// Orchestrate one full benchmark run.
///
/// All fallible setup (target resolution, client construction, output
/// directory creation) happens before the first request is dispatched.
/// Returns only after the summary has been written, so the process can
/// never exit with results still buffered.
///
/// # Errors
///
/// Returns an error when setup fails or the summary cannot be written.
/// Detail-log failures are logged and do not fail the run.
pub async fn run_probe(args: &ProbeArgs) -> AppResult<()> {
    let clock = Clock;
    let targets = resolve_targets(args)?;
    let policy = ConnectionPolicy {
        connect_timeout: args.connect_timeout,
        request_timeout: args.request_timeout,
    };
    let clients = Arc::new(ClientSet::build(policy, &targets)?);

    let per_target = args.requests_per_target.get();
    let items = expand_work(&targets, per_target);
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);

    let output_dir = resolve_output_dir(args.output_dir.as_deref());
    ensure_output_dir(&output_dir)?;

    info!(
        "Benchmarking {} target(s), {} request(s) each ({} total)",
        targets.len(),
        per_target,
        total
    );
    info!(
        "Concurrency {}, rate {}, output {}",
        args.concurrency.get(),
        describe_rate(args.rate_per_sec),
        output_dir.display()
    );

    let (detail_tx, detail_handle) = if args.no_detail {
        (None, None)
    } else {
        let (tx, rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let handle = setup_detail_writer(output_dir.join(DETAIL_FILE), rx);
        (Some(tx), Some(handle))
    };

    let completed = Arc::new(AtomicU64::new(0));
    let in_flight = Arc::new(AtomicU64::new(0));

    let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
    let collector = setup_collector(
        outcome_rx,
        CollectorConfig {
            batch_size: args.batch_size.get(),
            detail_tx,
            completed: Arc::clone(&completed),
        },
    );

    let monitor = spawn_monitor(
        args.monitor_interval,
        total,
        Arc::clone(&completed),
        Arc::clone(&in_flight),
    );

    let run_start = clock.now();
    let gate = IntervalGate::from_rate(args.rate_per_sec).map(Arc::new);
    run_dispatcher(
        items,
        &clients,
        DispatchConfig {
            concurrency: args.concurrency.get(),
            gate,
        },
        outcome_tx,
        &in_flight,
    )
    .await;

    // The dispatcher dropped its sender; the collector drains and exits.
    let report = collector.await?;
    if let Some(monitor) = monitor {
        monitor.abort();
    }

    if let Some(handle) = detail_handle {
        match handle.await {
            Ok(Ok(rows)) => info!(
                "Wrote {} detail row(s) to {}",
                rows,
                output_dir.join(DETAIL_FILE).display()
            ),
            Ok(Err(err)) => warn!("Detail log incomplete: {}", err),
            Err(err) => warn!("Detail writer task failed: {}", err),
        }
    }

    let rows: Vec<SummaryRow> = report
        .aggregates
        .iter()
        .map(SummaryRow::from_aggregate)
        .collect();
    let summary_path = output_dir.join(SUMMARY_FILE);
    write_summary_csv(&summary_path, &rows)?;

    for line in summary_table_lines(&rows) {
        info!("{}", line);
    }
    info!(
        "Completed {} request(s) in {:.1?}; summary at {}",
        report.received,
        clock.elapsed_since(run_start),
        summary_path.display()
    );
    Ok(())
}

fn describe_rate(rate_per_sec: u64) -> String {
    if rate_per_sec == 0 {
        "unlimited".to_owned()
    } else {
        format!("{}/s", rate_per_sec)
    }
}
