//! Request scheduling and execution: work expansion, pacing, the
//! concurrency-bounded dispatcher, and the single-probe executor.

pub mod dispatcher;
pub mod executor;
pub mod policy;
pub mod rate;

pub use dispatcher::{DispatchConfig, WorkItem, expand_work, run_dispatcher};
pub use executor::execute_probe;
pub use policy::{ClientSet, ConnectionPolicy};
pub use rate::IntervalGate;
