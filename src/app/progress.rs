use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Spawn the periodic progress monitor; `None` when the interval is 0.
///
/// The monitor only reads the shared counters, so a stalled or slow run
/// still reports. It stops on its own once every request is accounted for.
pub fn spawn_monitor(
    interval_secs: u64,
    total: u64,
    completed: Arc<AtomicU64>,
    in_flight: Arc<AtomicU64>,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so the first report
        // lands one interval into the run.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let done = completed.load(Ordering::Relaxed);
            info!(
                "Progress: {}/{} completed, {} in flight",
                done,
                total,
                in_flight.load(Ordering::Relaxed)
            );
            if done >= total {
                break;
            }
        }
    }))
}
