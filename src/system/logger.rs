use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SERPROBE_LOG";

/// Install the global tracing subscriber.
///
/// Filter precedence: `SERPROBE_LOG`, then `RUST_LOG`, then a default of
/// `info` (`debug` for this crate with `--verbose`). Calling this more than
/// once is harmless; later calls leave the existing subscriber in place.
pub fn init_logging(verbose: bool, no_color: bool) {
    let default_directive = if verbose {
        concat!(env!("CARGO_PKG_NAME"), "=debug,info")
    } else {
        "info"
    };
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(|_| EnvFilter::new(default_directive), EnvFilter::new);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false);
    if subscriber.try_init().is_err() {
        tracing::debug!("Logging already initialized; keeping the existing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    #[test]
    fn repeated_initialization_is_a_no_op() {
        init_logging(false, true);
        init_logging(true, true);
    }
}
