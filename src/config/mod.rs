mod catalog;
mod loader;
mod types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use catalog::SERP_BASE_URL;
pub use loader::load_targets;
pub use types::{TargetEntry, TargetSpec, TargetsFile};

use crate::args::ProbeArgs;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

/// Resolve the final target list for a run: the built-in catalog, overlaid
/// with any targets file, filtered by `--engine` selections.
///
/// Built-in targets get `engine`, `no_cache=true`, and the API key appended
/// to their query; file-defined targets are taken as-is.
///
/// # Errors
///
/// Fails before any work starts when the targets file is invalid, a selected
/// id is unknown, the selection is empty, or a built-in target is selected
/// without an API key.
pub fn resolve_targets(args: &ProbeArgs) -> AppResult<Vec<Arc<TargetSpec>>> {
    let mut by_id: BTreeMap<Arc<str>, TargetSpec> = BTreeMap::new();
    for (engine, params) in catalog::CATALOG.iter() {
        let id: Arc<str> = Arc::from(*engine);
        let mut query: Vec<(String, String)> = vec![
            ("engine".to_owned(), (*engine).to_owned()),
            ("no_cache".to_owned(), "true".to_owned()),
        ];
        for (key, value) in params {
            query.push(((*key).to_owned(), (*value).to_owned()));
        }
        by_id.insert(
            id.clone(),
            TargetSpec {
                id,
                url: SERP_BASE_URL.to_owned(),
                query,
                timeout_override: None,
                proxy: None,
                builtin: true,
            },
        );
    }

    if let Some(path) = args.targets_file.as_ref() {
        for spec in load_targets(path)? {
            // A file entry with a catalog id replaces the built-in target.
            by_id.insert(spec.id.clone(), spec);
        }
    }

    let mut selected: Vec<Arc<TargetSpec>> = Vec::new();
    if args.engines.is_empty() {
        selected.extend(by_id.into_values().map(Arc::new));
    } else {
        for id in &args.engines {
            let spec = by_id.remove(id.as_str()).ok_or_else(|| {
                AppError::config(ConfigError::UnknownTarget { id: id.clone() })
            })?;
            selected.push(Arc::new(spec));
        }
    }

    if selected.is_empty() {
        return Err(AppError::validation(ValidationError::NoTargets));
    }

    let needs_key = selected.iter().any(|target| target.builtin);
    match args.api_key.as_deref() {
        Some(key) if needs_key => {
            let key = key.to_owned();
            selected = selected
                .into_iter()
                .map(|target| {
                    if !target.builtin {
                        return target;
                    }
                    let mut spec = (*target).clone();
                    spec.query.push(("api_key".to_owned(), key.clone()));
                    Arc::new(spec)
                })
                .collect();
        }
        Some(_) => {}
        None if needs_key => {
            return Err(AppError::validation(ValidationError::MissingApiKey));
        }
        None => {}
    }

    Ok(selected)
}
