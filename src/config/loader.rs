use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::{TargetEntry, TargetSpec, TargetsFile};

/// Load and validate a `--targets` TOML file.
///
/// Entries with a region list are expanded into one target per region, with
/// `{region}` substituted in the proxy URL and the region appended to the id.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, defines no
/// targets, repeats a target id, or contains an invalid URL.
pub fn load_targets(path: &Path) -> AppResult<Vec<TargetSpec>> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadTargets {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let file: TargetsFile = toml::from_str(&raw).map_err(|err| {
        AppError::config(ConfigError::ParseTargets {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    if file.targets.is_empty() {
        return Err(AppError::config(ConfigError::EmptyTargets {
            path: path.to_path_buf(),
        }));
    }

    let mut specs = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    for entry in &file.targets {
        for spec in expand_entry(entry)? {
            if !seen.insert(spec.id.clone()) {
                return Err(AppError::config(ConfigError::DuplicateTarget {
                    id: spec.id.as_ref().to_owned(),
                }));
            }
            specs.push(spec);
        }
    }
    Ok(specs)
}

fn expand_entry(entry: &TargetEntry) -> AppResult<Vec<TargetSpec>> {
    url::Url::parse(&entry.url).map_err(|err| {
        AppError::config(ConfigError::InvalidTargetUrl {
            id: entry.id.clone(),
            source: err,
        })
    })?;

    let query: Vec<(String, String)> = entry
        .query
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let timeout_override = entry.timeout_secs.map(Duration::from_secs);

    if entry.proxy.is_some() && !entry.regions.is_empty() {
        let proxy_template = entry.proxy.as_deref().unwrap_or_default();
        return entry
            .regions
            .iter()
            .map(|region| {
                Ok(TargetSpec {
                    id: Arc::from(format!("{}-{}", entry.id, region).as_str()),
                    url: entry.url.clone(),
                    query: query.clone(),
                    timeout_override,
                    proxy: Some(proxy_template.replace("{region}", region)),
                    builtin: false,
                })
            })
            .collect();
    }
    if entry.proxy.is_none() && !entry.regions.is_empty() {
        return Err(AppError::config(ConfigError::RegionsWithoutProxy {
            id: entry.id.clone(),
        }));
    }

    Ok(vec![TargetSpec {
        id: Arc::from(entry.id.as_str()),
        url: entry.url.clone(),
        query,
        timeout_override,
        proxy: entry.proxy.clone(),
        builtin: false,
    }])
}
