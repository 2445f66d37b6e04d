//! Typed view of dbt's manifest.json artifact
//!
//! Only the fields the correlator actually reads are modeled; everything is
//! optional or defaulted so that parsing never fails on an individual node.
//! Downstream components (the dataset resolver) validate lazily, per node
//! they touch.

use crate::artifacts::read_artifact;
use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const FILE_NAME: &str = "manifest.json";

/// Parsed manifest.json: the static definition of the project graph
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// All nodes (models, tests, seeds, ...) keyed by unique id
    pub nodes: HashMap<String, ManifestNode>,

    /// Source definitions keyed by unique id (presence only; the correlator
    /// does not read into them)
    pub sources: HashMap<String, Value>,

    /// Project metadata
    pub metadata: ManifestMetadata,
}

/// A node's static definition, restricted to the fields the core reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestNode {
    /// Target database
    #[serde(default)]
    pub database: Option<String>,

    /// Target schema
    #[serde(default)]
    pub schema: Option<String>,

    /// Logical node name
    #[serde(default)]
    pub name: Option<String>,

    /// Physical table alias; takes precedence over `name` when present
    #[serde(default)]
    pub alias: Option<String>,

    /// Upstream references
    #[serde(default)]
    pub refs: Vec<NodeRef>,

    /// Generic-test metadata, present on test nodes only
    #[serde(default)]
    pub test_metadata: Option<TestMetadata>,
}

/// One entry of a node's `refs` list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeRef {
    /// Referenced model name
    #[serde(default)]
    pub name: Option<String>,
}

/// Test metadata attached to generic test nodes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestMetadata {
    /// Generic test name (unique, not_null, accepted_values, ...)
    #[serde(default)]
    pub name: Option<String>,

    /// Test keyword arguments
    #[serde(default)]
    pub kwargs: TestKwargs,
}

/// Keyword arguments of a generic test
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestKwargs {
    /// Column the test applies to, when column-scoped
    #[serde(default)]
    pub column_name: Option<String>,
}

/// Manifest metadata block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestMetadata {
    /// dbt adapter type (duckdb, postgres, snowflake, ...)
    #[serde(default)]
    pub adapter_type: Option<String>,

    /// dbt project name
    #[serde(default)]
    pub project_name: Option<String>,

    /// dbt version that wrote the manifest
    #[serde(default)]
    pub dbt_version: Option<String>,
}

impl Manifest {
    /// Read and parse manifest.json from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = read_artifact(path)?;
        Self::parse(&data)
    }

    /// Parse an already-decoded manifest document.
    ///
    /// Requires the three top-level keys (`nodes`, `sources`, `metadata`);
    /// performs no per-node validation beyond shaping the fields above.
    pub fn parse(data: &Value) -> CoreResult<Self> {
        let nodes_val = data.get("nodes").ok_or_else(|| missing("nodes"))?;
        let sources_val = data.get("sources").ok_or_else(|| missing("sources"))?;
        let metadata_val = data.get("metadata").ok_or_else(|| missing("metadata"))?;

        let nodes: HashMap<String, ManifestNode> = nodes_val
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(id, node)| (id.clone(), parse_node(node)))
                    .collect()
            })
            .unwrap_or_default();

        let sources: HashMap<String, Value> = sources_val
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let metadata: ManifestMetadata =
            serde_json::from_value(metadata_val.clone()).unwrap_or_default();

        Ok(Self {
            nodes,
            sources,
            metadata,
        })
    }

    /// Get a node definition by unique id
    pub fn get_node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes.get(unique_id)
    }

    /// Number of nodes in the manifest
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Shape a node object into the typed record, tolerating unknown fields and
/// wrong shapes (a malformed node becomes an all-default record and fails
/// later, attributably, in the resolver)
fn parse_node(node: &Value) -> ManifestNode {
    serde_json::from_value(node.clone()).unwrap_or_default()
}

fn missing(field: &str) -> CoreError {
    CoreError::MissingField {
        field: field.to_string(),
        file: FILE_NAME.to_string(),
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
