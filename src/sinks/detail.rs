use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::RequestOutcome;

use super::csv_escape;

const HEADER: &str = "timestamp,target,seq,status_code,elapsed_ms,bytes,success,reason\n";

fn write_err(path: &Path, source: std::io::Error) -> AppError {
    AppError::sink(SinkError::WriteDetail {
        path: path.to_path_buf(),
        source,
    })
}

/// Spawn the detail writer task. It owns the file for the whole run,
/// appends one CSV row per outcome as batches arrive, and exits when the
/// batch channel closes. Returns the number of rows written.
///
/// The header is written only when the file is empty, so re-running into an
/// existing file appends rows instead of stacking headers.
pub fn setup_detail_writer(
    path: PathBuf,
    mut rx: mpsc::Receiver<Vec<RequestOutcome>>,
) -> JoinHandle<AppResult<u64>> {
    tokio::spawn(async move {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| write_err(&path, err))?;
        let existing = file
            .metadata()
            .await
            .map_err(|err| write_err(&path, err))?
            .len();
        if existing == 0 {
            file.write_all(HEADER.as_bytes())
                .await
                .map_err(|err| write_err(&path, err))?;
        }

        let mut rows: u64 = 0;
        while let Some(batch) = rx.recv().await {
            let mut buffer = String::new();
            for outcome in &batch {
                buffer.push_str(&format_row(outcome));
            }
            file.write_all(buffer.as_bytes())
                .await
                .map_err(|err| write_err(&path, err))?;
            rows = rows.saturating_add(u64::try_from(batch.len()).unwrap_or(u64::MAX));
            debug!("Flushed {} detail rows to {}", batch.len(), path.display());
        }
        file.flush().await.map_err(|err| write_err(&path, err))?;
        Ok(rows)
    })
}

fn format_row(outcome: &RequestOutcome) -> String {
    let status = outcome
        .status
        .map_or_else(String::new, |status| status.to_string());
    let bytes = outcome
        .body_bytes
        .map_or_else(String::new, |bytes| bytes.to_string());
    let reason = outcome
        .verdict
        .failure_reason()
        .map_or_else(String::new, |reason| csv_escape(&reason.to_string()));
    format!(
        "{},{},{},{},{},{},{},{}\n",
        outcome.wall_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        csv_escape(&outcome.target_id),
        outcome.seq,
        status,
        outcome.elapsed_ms(),
        bytes,
        outcome.verdict.is_success(),
        reason,
    )
}
