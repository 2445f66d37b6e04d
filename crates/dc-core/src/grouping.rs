//! Grouping execution results by the dataset they apply to

use crate::manifest::Manifest;
use crate::resolver::{resolve_test_dataset, DatasetIdentity};
use crate::run_results::RunResults;
use serde_json::Value;
use std::collections::HashMap;

/// One test result annotated with its manifest metadata, ready to become an
/// OpenLineage assertion
#[derive(Debug, Clone)]
pub struct TestOutcome {
    /// Test node unique id
    pub unique_id: String,

    /// Raw dbt status string
    pub status: String,

    /// Failing row count for failed tests
    pub failures: Option<i64>,

    /// Error message or detail
    pub message: Option<String>,

    /// Generic test name (`unknown_test` when the node has no test metadata)
    pub test_name: String,

    /// Column under test, when column-scoped
    pub column_name: Option<String>,
}

/// Execution statistics for one executed model
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Rows written, from the adapter response when the adapter reports it
    pub row_count: Option<i64>,

    /// Node execution time in seconds
    pub duration_secs: f64,
}

/// Group test results by the dataset they validate.
///
/// Unresolvable results are skipped with a warning; one bad entry never drops
/// the rest. Dataset order follows first appearance in the results list so
/// event ordering is deterministic.
pub fn group_tests_by_dataset(
    run_results: &RunResults,
    manifest: &Manifest,
) -> Vec<(DatasetIdentity, Vec<TestOutcome>)> {
    let mut order: Vec<DatasetIdentity> = Vec::new();
    let mut groups: HashMap<DatasetIdentity, Vec<TestOutcome>> = HashMap::new();

    for result in &run_results.results {
        let Some(node) = manifest.get_node(&result.unique_id) else {
            log::warn!("Test node not found in manifest: {}", result.unique_id);
            continue;
        };

        let (test_name, column_name) = match &node.test_metadata {
            Some(meta) => (
                meta.name.clone().unwrap_or_else(|| "unknown_test".to_string()),
                meta.kwargs.column_name.clone(),
            ),
            None => ("unknown_test".to_string(), None),
        };

        let dataset = match resolve_test_dataset(&result.unique_id, manifest) {
            Ok(identity) => identity,
            Err(e) => {
                log::warn!(
                    "Could not resolve dataset for test {}: {e}",
                    result.unique_id
                );
                continue;
            }
        };

        let outcome = TestOutcome {
            unique_id: result.unique_id.clone(),
            status: result.status.clone(),
            failures: result.failures,
            message: result.message.clone(),
            test_name,
            column_name,
        };

        match groups.get_mut(&dataset) {
            Some(existing) => existing.push(outcome),
            None => {
                order.push(dataset.clone());
                groups.insert(dataset, vec![outcome]);
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let outcomes = groups.remove(&key).unwrap_or_default();
            (key, outcomes)
        })
        .collect()
}

/// Unique ids of executed model nodes, in input order
pub fn executed_models(run_results: &RunResults) -> Vec<String> {
    run_results
        .results
        .iter()
        .filter(|r| r.unique_id.starts_with("model."))
        .map(|r| r.unique_id.clone())
        .collect()
}

/// Per-model execution statistics keyed by model unique id.
///
/// Row counts come from `adapter_response.rows_affected`, which not every
/// adapter reports; absent counts leave `row_count` unset.
pub fn execution_stats(run_results: &RunResults) -> HashMap<String, ExecutionStats> {
    run_results
        .results
        .iter()
        .filter(|r| r.unique_id.starts_with("model."))
        .map(|r| {
            let row_count = r
                .adapter_response
                .as_ref()
                .and_then(|resp| resp.get("rows_affected"))
                .and_then(Value::as_i64);
            (
                r.unique_id.clone(),
                ExecutionStats {
                    row_count,
                    duration_secs: r.execution_time,
                },
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "grouping_test.rs"]
mod tests;
