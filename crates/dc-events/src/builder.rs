//! Constructing OpenLineage events from grouped dbt results
//!
//! Three event shapes are built here: wrapping events that bound a run
//! (START and a terminal COMPLETE/FAIL), quality events carrying
//! dataQualityAssertions facets, and lineage events carrying
//! outputStatistics. All events of one invocation share the caller's run id.

use crate::event::{
    Assertion, DataQualityAssertionsFacet, InputDataset, InputFacets, JobRef, OutputDataset,
    OutputFacets, OutputStatisticsFacet, RunEvent, RunEventType, RunRef, PRODUCER, SCHEMA_URL,
};
use chrono::{DateTime, SecondsFormat, Utc};
use dc_core::grouping::{ExecutionStats, TestOutcome};
use dc_core::resolver::{DatasetIdentity, ModelLineage};
use std::collections::HashMap;

/// Map a dbt test status to the assertion success flag.
///
/// Only a case-insensitive "pass" counts as success; fail, error, skipped,
/// warn, and anything unrecognized all map to false. Skipped and warn are
/// deliberately conflated with failure; changing that would alter
/// correlation semantics for existing consumers.
pub fn map_test_status(status: &str) -> bool {
    status.eq_ignore_ascii_case("pass")
}

/// Build a START/COMPLETE/FAIL wrapping event.
///
/// Wrapping events bound the run in the event stream and carry no datasets.
/// Terminal-kind selection (COMPLETE iff the wrapped process exited 0) is
/// the caller's decision; any kind is accepted uniformly.
pub fn wrapping_event(
    kind: RunEventType,
    run_id: &str,
    job_name: &str,
    namespace: &str,
    timestamp: DateTime<Utc>,
) -> RunEvent {
    RunEvent {
        event_type: kind,
        event_time: format_event_time(timestamp),
        run: RunRef {
            run_id: run_id.to_string(),
        },
        job: JobRef {
            namespace: namespace.to_string(),
            name: job_name.to_string(),
        },
        producer: PRODUCER.to_string(),
        schema_url: SCHEMA_URL.to_string(),
        inputs: vec![],
        outputs: vec![],
    }
}

/// Build one quality event per dataset group.
///
/// Each event carries the group's assertions in input order under the
/// dataset's dataQualityAssertions facet; groups are never empty, so every
/// emitted facet has at least one assertion.
pub fn quality_events(
    grouped: &[(DatasetIdentity, Vec<TestOutcome>)],
    namespace: &str,
    job_name: &str,
    run_id: &str,
    event_time: DateTime<Utc>,
) -> Vec<RunEvent> {
    grouped
        .iter()
        .map(|(dataset, outcomes)| {
            let assertions = outcomes.iter().map(to_assertion).collect();

            let input = InputDataset {
                namespace: dataset.namespace.clone(),
                name: dataset.name.clone(),
                facets: HashMap::new(),
                input_facets: Some(InputFacets {
                    data_quality_assertions: DataQualityAssertionsFacet::new(assertions),
                }),
            };

            RunEvent {
                event_type: RunEventType::Complete,
                event_time: format_event_time(event_time),
                run: RunRef {
                    run_id: run_id.to_string(),
                },
                job: JobRef {
                    namespace: namespace.to_string(),
                    name: job_name.to_string(),
                },
                producer: PRODUCER.to_string(),
                schema_url: SCHEMA_URL.to_string(),
                inputs: vec![input],
                outputs: vec![],
            }
        })
        .collect()
}

/// Build one lineage event per executed model.
///
/// Inputs are the model's upstream datasets; the output is the model's own
/// dataset with an outputStatistics facet. Models without reported
/// statistics still get the facet, with no row count.
pub fn lineage_events(
    lineages: &[ModelLineage],
    stats: &HashMap<String, ExecutionStats>,
    run_id: &str,
    job_namespace: &str,
    job_name: &str,
    event_time: DateTime<Utc>,
) -> Vec<RunEvent> {
    lineages
        .iter()
        .map(|lineage| {
            let row_count = stats
                .get(&lineage.model_id)
                .and_then(|s| s.row_count);

            let inputs = lineage
                .inputs
                .iter()
                .map(|d| InputDataset {
                    namespace: d.namespace.clone(),
                    name: d.name.clone(),
                    facets: HashMap::new(),
                    input_facets: None,
                })
                .collect();

            let output = OutputDataset {
                namespace: lineage.output.namespace.clone(),
                name: lineage.output.name.clone(),
                facets: HashMap::new(),
                output_facets: Some(OutputFacets {
                    output_statistics: OutputStatisticsFacet::new(row_count),
                }),
            };

            RunEvent {
                event_type: RunEventType::Complete,
                event_time: format_event_time(event_time),
                run: RunRef {
                    run_id: run_id.to_string(),
                },
                job: JobRef {
                    namespace: job_namespace.to_string(),
                    name: job_name.to_string(),
                },
                producer: PRODUCER.to_string(),
                schema_url: SCHEMA_URL.to_string(),
                inputs,
                outputs: vec![output],
            }
        })
        .collect()
}

fn to_assertion(outcome: &TestOutcome) -> Assertion {
    let assertion = match &outcome.column_name {
        Some(column) => format!("{}({})", outcome.test_name, column),
        None => outcome.test_name.clone(),
    };

    Assertion {
        assertion,
        success: map_test_status(&outcome.status),
        column: outcome.column_name.clone(),
    }
}

fn format_event_time(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
