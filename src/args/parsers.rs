use std::time::Duration;

use crate::error::ValidationError;

use super::types::{PositiveU64, PositiveUsize};

/// Parse a CLI value into a positive `u64`.
///
/// # Errors
///
/// Returns an error when the value is not a number or is zero.
pub fn parse_positive_u64(value: &str) -> Result<PositiveU64, String> {
    let parsed: u64 = value
        .parse()
        .map_err(|err| ValidationError::InvalidNumber { source: err }.to_string())?;
    PositiveU64::try_from(parsed)
}

/// Parse a CLI value into a positive `usize`.
///
/// # Errors
///
/// Returns an error when the value is not a number or is zero.
pub fn parse_positive_usize(value: &str) -> Result<PositiveUsize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|err| ValidationError::InvalidNumber { source: err }.to_string())?;
    PositiveUsize::try_from(parsed)
}

/// Parse a CLI value in whole seconds into a non-zero `Duration`.
///
/// # Errors
///
/// Returns an error when the value is not a number or is zero.
pub fn parse_duration_secs(value: &str) -> Result<Duration, String> {
    let parsed: u64 = value
        .parse()
        .map_err(|err| ValidationError::InvalidNumber { source: err }.to_string())?;
    if parsed == 0 {
        return Err(ValidationError::DurationZero.to_string());
    }
    Ok(Duration::from_secs(parsed))
}
