use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::{RequestOutcome, TargetAggregate};

pub struct CollectorConfig {
    /// Detail rows buffered before a batch is handed to the writer.
    pub batch_size: usize,
    /// Destination for full detail batches; `None` disables detail logging.
    pub detail_tx: Option<mpsc::Sender<Vec<RequestOutcome>>>,
    /// Completed-request gauge shared with the progress monitor.
    pub completed: Arc<AtomicU64>,
}

#[derive(Debug)]
pub struct CollectorReport {
    /// Finalized aggregates, ordered by target id.
    pub aggregates: Vec<TargetAggregate>,
    pub received: u64,
}

/// Spawn the single consumer that owns every per-target aggregate.
///
/// Routing all outcomes through one task eliminates shared-memory races: no
/// other component reads or writes an aggregate mid-run. The task finishes
/// when the outcome channel closes, i.e. after each work item has produced
/// exactly one outcome.
///
/// Detail batches are swapped out (`std::mem::take`) and sent to the writer
/// task, so recording never waits on file I/O beyond the buffer swap.
#[must_use]
pub fn setup_collector(
    mut outcome_rx: mpsc::Receiver<RequestOutcome>,
    config: CollectorConfig,
) -> JoinHandle<CollectorReport> {
    tokio::spawn(async move {
        let mut aggregates: BTreeMap<Arc<str>, TargetAggregate> = BTreeMap::new();
        let mut buffer: Vec<RequestOutcome> = Vec::new();
        let detail_enabled = config.detail_tx.is_some();
        let mut received: u64 = 0;

        while let Some(outcome) = outcome_rx.recv().await {
            received = received.saturating_add(1);
            config.completed.store(received, Ordering::Relaxed);

            aggregates
                .entry(outcome.target_id.clone())
                .or_insert_with(|| TargetAggregate::new(outcome.target_id.clone()))
                .record(&outcome);

            if detail_enabled {
                buffer.push(outcome);
                if buffer.len() >= config.batch_size {
                    flush(config.detail_tx.as_ref(), &mut buffer).await;
                }
            }
        }

        // Final partial flush.
        if !buffer.is_empty() {
            flush(config.detail_tx.as_ref(), &mut buffer).await;
        }

        CollectorReport {
            aggregates: aggregates.into_values().collect(),
            received,
        }
    })
}

async fn flush(detail_tx: Option<&mpsc::Sender<Vec<RequestOutcome>>>, buffer: &mut Vec<RequestOutcome>) {
    let batch = std::mem::take(buffer);
    let len = batch.len();
    let Some(tx) = detail_tx else {
        return;
    };
    if tx.send(batch).await.is_err() {
        warn!("Detail writer dropped; {} rows lost", len);
    } else {
        debug!("Handed {} detail rows to the writer", len);
    }
}
