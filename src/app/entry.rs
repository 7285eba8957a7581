use clap::Parser;

use crate::args::ProbeArgs;
use crate::error::AppResult;
use crate::system::init_logging;

use super::runner::run_probe;

/// Binary entry point: parse arguments, set up logging, run the benchmark
/// on a fresh multi-threaded runtime.
///
/// # Errors
///
/// Returns an error when runtime construction or the run itself fails.
pub fn run() -> AppResult<()> {
    let args = ProbeArgs::parse();
    init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_probe(&args))
}
