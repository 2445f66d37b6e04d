//! OpenLineage RunEvent wire types
//!
//! The shapes here reproduce the OpenLineage run-event schema field for
//! field; consumers on the other end of the wire validate against the
//! published spec, so serde renames matter more than Rust naming taste.
//!
//! - Core spec: https://openlineage.io/docs/spec/object-model
//! - dataQualityAssertions facet:
//!   https://openlineage.io/docs/spec/facets/dataset-facets/data-quality-assertions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Producer URI stamped on every event and facet, fixed at build time
pub const PRODUCER: &str = concat!(
    "https://github.com/correlator-io/dbt-correlator-rs/",
    env!("CARGO_PKG_VERSION")
);

/// OpenLineage run-event schema URL
pub const SCHEMA_URL: &str = "https://openlineage.io/spec/2-0-2/OpenLineage.json";

/// dataQualityAssertions facet schema URL
pub const DQA_FACET_SCHEMA_URL: &str =
    "https://openlineage.io/spec/facets/1-0-0/DataQualityAssertionsDatasetFacet.json";

/// outputStatistics facet schema URL
pub const OUTPUT_STATS_FACET_SCHEMA_URL: &str =
    "https://openlineage.io/spec/facets/1-0-2/OutputStatisticsOutputDatasetFacet.json";

/// Run-event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunEventType {
    /// Run began
    Start,
    /// Run heartbeat
    Running,
    /// Run finished successfully
    Complete,
    /// Run finished with failures
    Fail,
    /// Run was aborted
    Abort,
    /// Anything else
    Other,
}

impl std::fmt::Display for RunEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunEventType::Start => write!(f, "START"),
            RunEventType::Running => write!(f, "RUNNING"),
            RunEventType::Complete => write!(f, "COMPLETE"),
            RunEventType::Fail => write!(f, "FAIL"),
            RunEventType::Abort => write!(f, "ABORT"),
            RunEventType::Other => write!(f, "OTHER"),
        }
    }
}

/// One OpenLineage run event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    /// Event kind (START/COMPLETE/FAIL/...)
    #[serde(rename = "eventType")]
    pub event_type: RunEventType,

    /// Event timestamp, ISO-8601
    #[serde(rename = "eventTime")]
    pub event_time: String,

    /// Run reference; every event of one invocation shares the run id
    pub run: RunRef,

    /// Job reference
    pub job: JobRef,

    /// Producer URI
    pub producer: String,

    /// Run-event schema URL
    #[serde(rename = "schemaURL")]
    pub schema_url: String,

    /// Input datasets
    pub inputs: Vec<InputDataset>,

    /// Output datasets
    pub outputs: Vec<OutputDataset>,
}

/// Reference to the run this event belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRef {
    /// Run id, a UUID string
    #[serde(rename = "runId")]
    pub run_id: String,
}

/// Reference to the job this event belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRef {
    /// Job namespace (e.g. "dbt")
    pub namespace: String,

    /// Job name (e.g. "jaffle_shop.test")
    pub name: String,
}

/// An input dataset, optionally carrying input facets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDataset {
    /// Dataset namespace, `{adapter}://{database}`
    pub namespace: String,

    /// Dataset name, `{schema}.{table}`
    pub name: String,

    /// Generic dataset facets (unused by this producer, kept for shape)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub facets: HashMap<String, serde_json::Value>,

    /// Input-specific facets
    #[serde(
        rename = "inputFacets",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_facets: Option<InputFacets>,
}

/// An output dataset, optionally carrying output facets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDataset {
    /// Dataset namespace
    pub namespace: String,

    /// Dataset name
    pub name: String,

    /// Generic dataset facets
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub facets: HashMap<String, serde_json::Value>,

    /// Output-specific facets
    #[serde(
        rename = "outputFacets",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub output_facets: Option<OutputFacets>,
}

/// Input facet container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFacets {
    /// Pass/fail assertions attached to the dataset
    #[serde(rename = "dataQualityAssertions")]
    pub data_quality_assertions: DataQualityAssertionsFacet,
}

/// Output facet container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFacets {
    /// Execution statistics for the materialized dataset
    #[serde(rename = "outputStatistics")]
    pub output_statistics: OutputStatisticsFacet,
}

/// dataQualityAssertions input-dataset facet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityAssertionsFacet {
    /// Facet producer URI
    #[serde(rename = "_producer")]
    pub producer: String,

    /// Facet schema URL
    #[serde(rename = "_schemaURL")]
    pub schema_url: String,

    /// Assertions, in test-result order
    pub assertions: Vec<Assertion>,
}

/// One pass/fail quality check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    /// Assertion label: test name, suffixed `(column)` when column-scoped
    pub assertion: String,

    /// Whether the check passed
    pub success: bool,

    /// Column under test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// outputStatistics output-dataset facet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputStatisticsFacet {
    /// Facet producer URI
    #[serde(rename = "_producer")]
    pub producer: String,

    /// Facet schema URL
    #[serde(rename = "_schemaURL")]
    pub schema_url: String,

    /// Rows written, when the adapter reported it
    #[serde(rename = "rowCount", default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
}

impl DataQualityAssertionsFacet {
    /// Facet with the standard producer/schema metadata
    pub fn new(assertions: Vec<Assertion>) -> Self {
        Self {
            producer: PRODUCER.to_string(),
            schema_url: DQA_FACET_SCHEMA_URL.to_string(),
            assertions,
        }
    }
}

impl OutputStatisticsFacet {
    /// Facet with the standard producer/schema metadata
    pub fn new(row_count: Option<i64>) -> Self {
        Self {
            producer: PRODUCER.to_string(),
            schema_url: OUTPUT_STATS_FACET_SCHEMA_URL.to_string(),
            row_count,
        }
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
