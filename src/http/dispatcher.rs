use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tokio::sync::{Semaphore, mpsc};
use tracing::warn;

use crate::clock::Clock;
use crate::config::TargetSpec;
use crate::metrics::RequestOutcome;

use super::executor::execute_probe;
use super::policy::ClientSet;
use super::rate::IntervalGate;

/// One scheduled request: a target plus a per-request sequence number and a
/// cache-busting nonce.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub target: Arc<TargetSpec>,
    pub seq: u64,
    pub nonce: String,
}

/// Expand the selected targets into the full work list, `per_target` items
/// each, in target order. Nonces are unique across the run so no two
/// requests are ever served from the same cache entry.
#[must_use]
pub fn expand_work(targets: &[Arc<TargetSpec>], per_target: u64) -> Vec<WorkItem> {
    let mut rng = rand::thread_rng();
    let mut items = Vec::new();
    for target in targets {
        for seq in 0..per_target {
            items.push(WorkItem {
                target: Arc::clone(target),
                seq,
                nonce: format!("{:016x}-{}", rng.r#gen::<u64>(), seq),
            });
        }
    }
    items
}

#[derive(Debug)]
pub struct DispatchConfig {
    /// Upper bound on simultaneously in-flight requests.
    pub concurrency: usize,
    /// Optional pacing gate; `None` dispatches as fast as permits allow.
    pub gate: Option<Arc<IntervalGate>>,
}

/// Drive the whole work list to completion.
///
/// Admission order is fixed: the rate gate first, then a concurrency permit.
/// A paced slot therefore cannot be consumed by a request that then sits
/// waiting for a permit. Each spawned probe owns its permit for its entire
/// lifetime, so the in-flight count can never exceed `concurrency` no matter
/// how a request ends. Every work item produces exactly one outcome.
pub async fn run_dispatcher(
    items: Vec<WorkItem>,
    clients: &Arc<ClientSet>,
    config: DispatchConfig,
    outcome_tx: mpsc::Sender<RequestOutcome>,
    in_flight: &Arc<AtomicU64>,
) {
    let DispatchConfig { concurrency, gate } = config;
    let clock = Clock;
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        if let Some(gate) = gate.as_deref() {
            gate.admit().await;
        }
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            // The semaphore is never closed while dispatching.
            warn!("Concurrency semaphore closed; stopping dispatch");
            break;
        };

        let clients = Arc::clone(clients);
        let outcome_tx = outcome_tx.clone();
        let in_flight = Arc::clone(in_flight);
        handles.push(tokio::spawn(async move {
            let _permit = permit;
            in_flight.fetch_add(1, Ordering::Relaxed);
            let client = clients.client_for(&item.target.id);
            let outcome = execute_probe(client, clock, &item).await;
            in_flight.fetch_sub(1, Ordering::Relaxed);
            if outcome_tx.send(outcome).await.is_err() {
                warn!("Result collector stopped; dropping outcome");
            }
        }));
    }
    drop(outcome_tx);

    for handle in handles {
        if let Err(err) = handle.await {
            warn!("Probe task failed: {}", err);
        }
    }
}
