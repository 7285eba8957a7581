mod cli;
mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::ProbeArgs;
pub use parsers::{parse_duration_secs, parse_positive_u64, parse_positive_usize};
pub use types::{PositiveU64, PositiveUsize};

pub const DEFAULT_USER_AGENT: &str = concat!("serprobe/", env!("CARGO_PKG_VERSION"));
