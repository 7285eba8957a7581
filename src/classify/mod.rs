//! Pure success/failure classification of a completed probe.
//!
//! Classification runs strictly after the end timestamp has been captured;
//! nothing here touches the network or the clock.


use serde_json::Value;

/// Top-level fields that carry results. Engines differ in which of these
/// they populate, so any one of them counts.
const RESULT_FIELDS: [&str; 9] = [
    "organic_results",
    "inline_images",
    "local_results",
    "shopping_results",
    "jobs_results",
    "news_results",
    "video_results",
    "answer_box",
    "knowledge_graph",
];

/// Transport-level failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl TransportKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "transport",
        }
    }
}

/// Why a response was judged a failure, ordered by detection precedence:
/// the first failing check determines the reason, so diagnostics always
/// report the most specific, earliest-detectable cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Transport { kind: TransportKind, detail: String },
    HttpStatus(u16),
    MalformedBody,
    MissingMetadata,
    ReportedError(String),
    EmptyResult,
}

impl FailureReason {
    /// Stable low-cardinality key used for per-target failure counting.
    #[must_use]
    pub fn code(&self) -> String {
        match *self {
            Self::Transport { kind, .. } => kind.as_str().to_owned(),
            Self::HttpStatus(status) => format!("http_{}", status),
            Self::MalformedBody => "malformed_body".to_owned(),
            Self::MissingMetadata => "missing_metadata".to_owned(),
            Self::ReportedError(_) => "api_error".to_owned(),
            Self::EmptyResult => "empty_result".to_owned(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { kind, detail } => write!(f, "{}: {}", kind.as_str(), detail),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::MalformedBody => write!(f, "Invalid JSON response"),
            Self::MissingMetadata => write!(f, "Missing search_metadata"),
            Self::ReportedError(detail) => write!(f, "API error: {}", detail),
            Self::EmptyResult => write!(f, "No results found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure(FailureReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(*self, Self::Success)
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match *self {
            Self::Success => None,
            Self::Failure(ref reason) => Some(reason),
        }
    }
}

/// Raw material for classification, assembled by the executor after the end
/// timestamp was captured.
#[derive(Debug, Default)]
pub struct RawResponse<'a> {
    pub transport_error: Option<(TransportKind, String)>,
    pub status: Option<u16>,
    pub body: Option<&'a [u8]>,
}

impl<'a> RawResponse<'a> {
    #[must_use]
    pub fn transport(kind: TransportKind, detail: String) -> Self {
        Self {
            transport_error: Some((kind, detail)),
            status: None,
            body: None,
        }
    }

    #[must_use]
    pub const fn received(status: u16, body: &'a [u8]) -> Self {
        Self {
            transport_error: None,
            status: Some(status),
            body: Some(body),
        }
    }
}

/// Map a raw response to a verdict. Deterministic and side-effect free.
#[must_use]
pub fn classify(raw: &RawResponse<'_>) -> Verdict {
    if let Some((kind, ref detail)) = raw.transport_error {
        return Verdict::Failure(FailureReason::Transport {
            kind,
            detail: detail.clone(),
        });
    }

    let Some(status) = raw.status else {
        return Verdict::Failure(FailureReason::Transport {
            kind: TransportKind::Other,
            detail: "no status received".to_owned(),
        });
    };
    if status != 200 {
        return Verdict::Failure(FailureReason::HttpStatus(status));
    }

    let body = raw.body.unwrap_or_default();
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return Verdict::Failure(FailureReason::MalformedBody),
    };
    let Some(object) = value.as_object() else {
        return Verdict::Failure(FailureReason::MalformedBody);
    };

    let Some(metadata) = object.get("search_metadata") else {
        return Verdict::Failure(FailureReason::MissingMetadata);
    };

    if let Some(detail) = object.get("error").and_then(Value::as_str) {
        return Verdict::Failure(FailureReason::ReportedError(detail.to_owned()));
    }
    if metadata.get("status").and_then(Value::as_str) == Some("error") {
        let detail = metadata
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_owned();
        return Verdict::Failure(FailureReason::ReportedError(detail));
    }

    if !has_results(object) {
        return Verdict::Failure(FailureReason::EmptyResult);
    }

    Verdict::Success
}

fn has_results(object: &serde_json::Map<String, Value>) -> bool {
    if RESULT_FIELDS.iter().any(|field| object.contains_key(*field)) {
        return true;
    }
    // More than search_metadata + search_parameters means some engine-specific
    // payload came back even if none of the known fields matched.
    object.keys().len() > 2
}
