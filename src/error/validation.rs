use thiserror::Error;

/// Configuration-class errors. These are the only errors that abort a run,
/// and they are surfaced before any work item is dispatched.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("No targets selected.")]
    NoTargets,
    #[error("Missing API key for built-in targets (set --api-key or SERPROBE_API_KEY).")]
    MissingApiKey,
}
