//! Typed view of dbt's run_results.json artifact

use crate::artifacts::read_artifact;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;

const FILE_NAME: &str = "run_results.json";

/// Metadata block of run_results.json
#[derive(Debug, Clone)]
pub struct RunMetadata {
    /// When dbt generated the results
    pub generated_at: DateTime<Utc>,

    /// Unique id for the dbt invocation
    pub invocation_id: String,

    /// dbt version that produced the artifact
    pub dbt_version: String,

    /// Total elapsed time for the run in seconds
    pub elapsed_time: f64,
}

/// One executed node's outcome (a test or a model)
#[derive(Debug, Clone, Default)]
pub struct NodeResult {
    /// Node unique id (e.g. test.jaffle_shop.unique_orders_id.abc123)
    pub unique_id: String,

    /// Execution status (pass, fail, error, skipped, warn, success, ...)
    pub status: String,

    /// Execution time in seconds
    pub execution_time: f64,

    /// Number of failing rows, for failed tests
    pub failures: Option<i64>,

    /// Error message or additional detail
    pub message: Option<String>,

    /// Compiled SQL for the node
    pub compiled_code: Option<String>,

    /// Thread the node executed on
    pub thread_id: Option<String>,

    /// Raw adapter response blob (carries rows_affected for models)
    pub adapter_response: Option<Value>,
}

/// Parsed run_results.json: one execution of dbt
#[derive(Debug, Clone)]
pub struct RunResults {
    /// Run metadata (timestamps, invocation id, version)
    pub metadata: RunMetadata,

    /// Per-node execution results, in artifact order
    pub results: Vec<NodeResult>,
}

impl RunResults {
    /// Read and parse run_results.json from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = read_artifact(path)?;
        Self::parse(&data)
    }

    /// Parse an already-decoded run_results document.
    ///
    /// Only `metadata` errors are fatal; malformed individual result entries
    /// fall back to per-field defaults instead of aborting the parse.
    pub fn parse(data: &Value) -> CoreResult<Self> {
        let metadata_obj = data.get("metadata").ok_or_else(|| missing("metadata"))?;

        let generated_at_str = require_str(metadata_obj, "generated_at")?;
        let generated_at = DateTime::parse_from_rfc3339(generated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CoreError::InvalidTimestamp {
                field: "metadata.generated_at".to_string(),
                value: generated_at_str.to_string(),
            })?;
        let invocation_id = require_str(metadata_obj, "invocation_id")?.to_string();
        let dbt_version = require_str(metadata_obj, "dbt_version")?.to_string();

        // elapsed_time lives at the top level in recent dbt versions, inside
        // metadata in older ones.
        let elapsed_time = data
            .get("elapsed_time")
            .and_then(Value::as_f64)
            .or_else(|| metadata_obj.get("elapsed_time").and_then(Value::as_f64))
            .unwrap_or(0.0);

        let metadata = RunMetadata {
            generated_at,
            invocation_id,
            dbt_version,
            elapsed_time,
        };

        let results = data
            .get("results")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(parse_result_entry).collect())
            .unwrap_or_default();

        Ok(Self { metadata, results })
    }
}

/// Parse one results[] entry with defensive defaults for every field
fn parse_result_entry(entry: &Value) -> NodeResult {
    NodeResult {
        unique_id: str_or_default(entry, "unique_id"),
        status: str_or_default(entry, "status"),
        execution_time: entry
            .get("execution_time")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        failures: entry.get("failures").and_then(Value::as_i64),
        message: entry
            .get("message")
            .and_then(Value::as_str)
            .map(String::from),
        compiled_code: entry
            .get("compiled_code")
            .and_then(Value::as_str)
            .map(String::from),
        thread_id: entry
            .get("thread_id")
            .and_then(Value::as_str)
            .map(String::from),
        adapter_response: entry
            .get("adapter_response")
            .filter(|v| !v.is_null())
            .cloned(),
    }
}

fn str_or_default(entry: &Value, field: &str) -> String {
    entry
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn require_str<'a>(obj: &'a Value, field: &str) -> CoreResult<&'a str> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(&format!("metadata.{field}")))
}

fn missing(field: &str) -> CoreError {
    CoreError::MissingField {
        field: field.to_string(),
        file: FILE_NAME.to_string(),
    }
}

#[cfg(test)]
#[path = "run_results_test.rs"]
mod tests;
