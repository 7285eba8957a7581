//! Output sinks: the per-request detail CSV, the per-target summary CSV,
//! and the console summary table.

pub mod detail;
pub mod summary;

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, SinkError};

pub use detail::setup_detail_writer;
pub use summary::{summary_table_lines, write_summary_csv};

pub const DETAIL_FILE: &str = "detailed_results.csv";
pub const SUMMARY_FILE: &str = "summary_statistics.csv";

/// Output directory for a run: the explicit override, or a dated directory
/// under the working directory.
#[must_use]
pub fn resolve_output_dir(override_dir: Option<&Path>) -> PathBuf {
    override_dir.map_or_else(
        || {
            let date = chrono::Local::now().format("%Y-%m-%d");
            PathBuf::from(format!("serprobe_results_{}", date))
        },
        Path::to_path_buf,
    )
}

/// Create the output directory before any work is dispatched, so a run
/// never completes only to find it has nowhere to write.
///
/// # Errors
///
/// Returns an error when the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> AppResult<()> {
    std::fs::create_dir_all(dir).map_err(|err| {
        AppError::sink(SinkError::CreateDir {
            path: dir.to_path_buf(),
            source: err,
        })
    })
}

/// Render a fixed-point x100 value with two decimals (6667 -> "66.67").
#[must_use]
pub fn format_x100(value: u64) -> String {
    let whole = value.checked_div(100).unwrap_or(0);
    let frac = value.checked_rem(100).unwrap_or(0);
    format!("{}.{:02}", whole, frac)
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
#[must_use]
pub fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
