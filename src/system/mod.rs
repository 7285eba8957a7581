//! Process-level plumbing shared by the binary and the tests.

pub mod logger;

pub use logger::init_logging;
