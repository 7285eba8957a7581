use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read targets file '{path}': {source}")]
    ReadTargets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse targets file '{path}': {source}")]
    ParseTargets {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Targets file '{path}' defines no targets.")]
    EmptyTargets { path: PathBuf },
    #[error("Duplicate target id '{id}'.")]
    DuplicateTarget { id: String },
    #[error("Invalid URL for target '{id}': {source}")]
    InvalidTargetUrl {
        id: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Target '{id}' lists regions but no proxy template to expand.")]
    RegionsWithoutProxy { id: String },
    #[error("Unknown target '{id}'. Not in the built-in catalog; define it in a targets file.")]
    UnknownTarget { id: String },
}
