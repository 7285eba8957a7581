use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;

use crate::classify::{RawResponse, TransportKind, classify};
use crate::clock::Clock;
use crate::metrics::RequestOutcome;

use super::dispatcher::WorkItem;

/// Query parameter carrying the per-request uniqueness token.
const NONCE_PARAM: &str = "probe_nonce";

/// Error detail longer than this is cut off in outcomes.
const ERROR_TRUNCATE_LEN: usize = 300;

/// Perform exactly one measured round trip for one work item.
///
/// Timing discipline: the start timestamp is taken after the request object
/// is built and immediately before `execute`, so DNS, connect, TLS, send,
/// and full body receipt all fall inside the measurement. The end timestamp
/// is captured before any parsing; classification and recording never fold
/// back into the elapsed duration. Every path, including timeouts and
/// transport errors, reads the clock and returns an outcome.
pub async fn execute_probe(client: &Client, clock: Clock, item: &WorkItem) -> RequestOutcome {
    let wall_time = chrono::Utc::now();
    let target = &item.target;

    let mut builder = client
        .get(target.url.as_str())
        .query(&target.query)
        .query(&[(NONCE_PARAM, item.nonce.as_str())]);
    if let Some(timeout) = target.timeout_override {
        builder = builder.timeout(timeout);
    }

    let request = match builder.build() {
        Ok(request) => request,
        Err(err) => {
            // Construction failed before any network I/O took place.
            return RequestOutcome {
                target_id: target.id.clone(),
                seq: item.seq,
                wall_time,
                started_at: clock.now(),
                elapsed: Duration::ZERO,
                status: None,
                body_bytes: None,
                verdict: classify(&RawResponse::transport(
                    TransportKind::Other,
                    truncate_detail(&err.to_string()),
                )),
                drained: false,
            };
        }
    };

    let started_at = clock.now();
    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            match read_body(response).await {
                Ok(body) => {
                    let elapsed = clock.elapsed_since(started_at);
                    // End timestamp captured; everything below is
                    // post-measurement work.
                    let verdict = classify(&RawResponse::received(status, &body));
                    RequestOutcome {
                        target_id: target.id.clone(),
                        seq: item.seq,
                        wall_time,
                        started_at,
                        elapsed,
                        status: Some(status),
                        body_bytes: Some(u64::try_from(body.len()).unwrap_or(u64::MAX)),
                        verdict,
                        drained: true,
                    }
                }
                Err(err) => {
                    let elapsed = clock.elapsed_since(started_at);
                    let verdict = classify(&RawResponse::transport(
                        transport_kind(&err),
                        truncate_detail(&err.to_string()),
                    ));
                    RequestOutcome {
                        target_id: target.id.clone(),
                        seq: item.seq,
                        wall_time,
                        started_at,
                        elapsed,
                        status: Some(status),
                        body_bytes: None,
                        verdict,
                        drained: false,
                    }
                }
            }
        }
        Err(err) => {
            // The clock is read on the timeout path too: elapsed reflects
            // the time actually spent waiting.
            let elapsed = clock.elapsed_since(started_at);
            let verdict = classify(&RawResponse::transport(
                transport_kind(&err),
                truncate_detail(&err.to_string()),
            ));
            RequestOutcome {
                target_id: target.id.clone(),
                seq: item.seq,
                wall_time,
                started_at,
                elapsed,
                status: err.status().map(|status| status.as_u16()),
                body_bytes: None,
                verdict,
                drained: false,
            }
        }
    }
}

fn transport_kind(err: &reqwest::Error) -> TransportKind {
    if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Other
    }
}

fn truncate_detail(detail: &str) -> String {
    let first_line = detail.lines().next().unwrap_or_default();
    let mut truncated: String = first_line.chars().take(ERROR_TRUNCATE_LEN).collect();
    if first_line.chars().count() > ERROR_TRUNCATE_LEN {
        truncated.push_str("...");
    }
    truncated
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}
