use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::parsers::{parse_duration_secs, parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent latency benchmark for SERP-style search APIs - bounded concurrency, fixed-interval rate gating, cache-busted fresh-connection requests, and per-engine CSV reports."
)]
pub struct ProbeArgs {
    /// Target id to benchmark; repeatable (default: the full built-in catalog)
    #[arg(long = "engine", short = 'e', value_name = "ID")]
    pub engines: Vec<String>,

    /// TOML file defining additional targets or overriding built-in ones
    #[arg(long = "targets", value_name = "FILE")]
    pub targets_file: Option<PathBuf>,

    /// Requests issued per target
    #[arg(long = "requests-per-target", short = 'n', default_value = "10", value_parser = parse_positive_u64)]
    pub requests_per_target: PositiveU64,

    /// Maximum simultaneous in-flight requests
    #[arg(long = "concurrency", short = 'c', default_value = "10", value_parser = parse_positive_usize)]
    pub concurrency: PositiveUsize,

    /// Dispatch rate limit in requests per second (0 = unlimited)
    #[arg(long = "rate", default_value_t = 0)]
    pub rate_per_sec: u64,

    /// Connection-establishment timeout in seconds
    #[arg(long = "connect-timeout", default_value = "5", value_parser = parse_duration_secs)]
    pub connect_timeout: Duration,

    /// Total per-request timeout in seconds
    #[arg(long = "request-timeout", default_value = "30", value_parser = parse_duration_secs)]
    pub request_timeout: Duration,

    /// API key appended to built-in catalog requests
    #[arg(long = "api-key", env = "SERPROBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Disable the detailed per-request CSV log (the summary is always written)
    #[arg(long = "no-detail")]
    pub no_detail: bool,

    /// Detail rows buffered before each CSV append
    #[arg(long = "batch-size", default_value = "1000", value_parser = parse_positive_usize)]
    pub batch_size: PositiveUsize,

    /// Seconds between progress log lines (0 disables the monitor)
    #[arg(long = "monitor-interval", default_value_t = 10)]
    pub monitor_interval: u64,

    /// Output directory (default: ./serprobe_results_<date>)
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
