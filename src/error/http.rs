use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid proxy URL '{url}' for target '{target}': {source}")]
    InvalidProxy {
        url: String,
        target: String,
        #[source]
        source: reqwest::Error,
    },
}
