use std::path::Path;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::SummaryRow;

use super::{csv_escape, format_x100};

const HEADER: &str = "target,total,successes,failures,success_rate_pct,\
mean_success_latency_ms,p50_ms,p90_ms,p99_ms,mean_success_bytes,span_ms,\
ms_per_request,failure_breakdown\n";

fn failure_total(row: &SummaryRow) -> u64 {
    row.failures
        .values()
        .fold(0u64, |sum, count| sum.saturating_add(*count))
}

fn failure_breakdown(row: &SummaryRow) -> String {
    row.failures
        .iter()
        .map(|(code, count)| format!("{}={}", code, count))
        .collect::<Vec<_>>()
        .join(";")
}

/// Write the per-target summary CSV in one shot, overwriting any previous
/// file at the path. Rows are written in the order given.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> AppResult<()> {
    let mut lines = vec![HEADER.trim_end().to_owned()];
    for row in rows {
        lines.push(format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_escape(&row.target_id),
            row.total,
            row.successes,
            failure_total(row),
            format_x100(row.success_rate_x100),
            row.mean_success_latency_ms,
            row.p50_ms,
            row.p90_ms,
            row.p99_ms,
            row.mean_success_bytes,
            row.span_ms,
            row.rate_ms_per_request,
            csv_escape(&failure_breakdown(row)),
        ));
    }
    let content = format!("{}\n", lines.join("\n"));
    std::fs::write(path, content).map_err(|err| {
        AppError::sink(SinkError::WriteSummary {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

/// Render the console summary table, one line per target plus a header.
#[must_use]
pub fn summary_table_lines(rows: &[SummaryRow]) -> Vec<String> {
    let id_width = rows
        .iter()
        .map(|row| row.target_id.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut lines = Vec::with_capacity(rows.len().saturating_add(1));
    lines.push(format!(
        "{:<id_width$}  {:>6}  {:>6}  {:>7}  {:>8}  {:>6}  {:>6}  {:>6}  failures",
        "target", "total", "ok", "rate%", "mean_ms", "p50", "p90", "p99",
    ));
    for row in rows {
        let breakdown = if row.failures.is_empty() {
            "-".to_owned()
        } else {
            failure_breakdown(row)
        };
        lines.push(format!(
            "{:<id_width$}  {:>6}  {:>6}  {:>7}  {:>8}  {:>6}  {:>6}  {:>6}  {}",
            row.target_id,
            row.total,
            row.successes,
            format_x100(row.success_rate_x100),
            row.mean_success_latency_ms,
            row.p50_ms,
            row.p90_ms,
            row.p99_ms,
            breakdown,
        ));
    }
    lines
}
