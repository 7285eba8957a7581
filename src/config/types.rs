use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

/// Static request-construction data for one logical target. Immutable for
/// the duration of a run.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub id: Arc<str>,
    /// Endpoint the probe requests are issued against.
    pub url: String,
    /// Fixed query parameters, already including engine selection, cache
    /// bypass, and (for built-in targets) the API key.
    pub query: Vec<(String, String)>,
    /// Per-target override of the total request timeout.
    pub timeout_override: Option<Duration>,
    /// Proxy this target's requests are routed through, if any.
    pub proxy: Option<String>,
    /// Whether this target came from the built-in catalog (these require an
    /// API key) as opposed to a targets file.
    pub builtin: bool,
}

/// Shape of a `--targets` TOML file: a list of `[[target]]` tables.
#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TargetEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Per-target override of the request timeout, in seconds.
    pub timeout_secs: Option<u64>,
    /// Proxy URL; may contain a `{region}` placeholder expanded per region.
    pub proxy: Option<String>,
    /// Regions the proxy placeholder is expanded with. Each region yields
    /// its own target (`<id>-<region>`), mirroring geo-exit latency runs.
    #[serde(default)]
    pub regions: Vec<String>,
}
