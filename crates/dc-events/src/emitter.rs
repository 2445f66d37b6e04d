//! Batch emission of OpenLineage events
//!
//! One HTTP POST per batch, one attempt per call. No retries at any layer:
//! events are best-effort telemetry and the caller decides whether a failed
//! emission matters.

use crate::event::RunEvent;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Fixed deadline for one emission request
const EMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Emission failure, classified for the caller
#[derive(Error, Debug)]
pub enum EmitError {
    /// Could not connect to the backend at all
    #[error("failed to connect to backend at {endpoint}: {message}")]
    Unreachable { endpoint: String, message: String },

    /// Request exceeded the 30-second deadline
    #[error("request to backend at {endpoint} timed out after {}s", EMIT_TIMEOUT.as_secs())]
    TimedOut { endpoint: String },

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    BackendRejected { status: u16, body: String },
}

/// Body shape of a 207 partial-success response
#[derive(Debug, Default, Deserialize)]
struct PartialSuccessBody {
    #[serde(default)]
    summary: PartialSuccessSummary,
    #[serde(default)]
    failed_events: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSuccessSummary {
    #[serde(default)]
    successful: u64,
    #[serde(default)]
    received: u64,
}

/// Emit a batch of events in a single POST.
///
/// No-op for an empty batch. The full list is serialized as one JSON array;
/// an `X-API-Key` header is attached when a key is supplied. 200 counts as
/// success, 207 as partial success (logged, not escalated), anything else
/// fails with `BackendRejected`.
pub async fn emit_events(
    events: &[RunEvent],
    endpoint: &str,
    api_key: Option<&str>,
) -> Result<(), EmitError> {
    if events.is_empty() {
        log::debug!("No events to emit");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let mut request = client
        .post(endpoint)
        .timeout(EMIT_TIMEOUT)
        .json(events);
    if let Some(key) = api_key {
        request = request.header("X-API-Key", key);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            EmitError::TimedOut {
                endpoint: endpoint.to_string(),
            }
        } else {
            EmitError::Unreachable {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    match status {
        200 => {
            log::info!("Emitted {} events to backend", events.len());
            Ok(())
        }
        207 => {
            let body: PartialSuccessBody = response.json().await.unwrap_or_default();
            log::warn!(
                "Partial success: {}/{} events accepted. Failed events: {:?}",
                body.summary.successful,
                body.summary.received,
                body.failed_events
            );
            Ok(())
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(EmitError::BackendRejected { status, body })
        }
    }
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
