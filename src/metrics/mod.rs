mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use collector::{CollectorConfig, CollectorReport, setup_collector};
pub use histogram::LatencyHistogram;
pub use types::{RequestOutcome, SummaryRow, TargetAggregate};
