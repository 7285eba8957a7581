//! Application wiring: the CLI entry point, the run orchestrator, and the
//! periodic progress monitor.

mod entry;
mod progress;
mod runner;

pub use entry::run;
pub use runner::run_probe;
