use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write detail log '{path}': {source}")]
    WriteDetail {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write summary '{path}': {source}")]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
