//! Dataset resolution: mapping node ids to physical dataset coordinates
//!
//! Resolving a test node to the dataset it validates takes five hops:
//! test id -> owning project -> first ref name -> model id -> location.
//! Every hop has its own error variant so a failed resolution is always
//! attributable to one specific missing piece of the manifest.

use crate::error::{CoreError, CoreResult};
use crate::manifest::{Manifest, ManifestNode};

/// Canonical dataset address used in OpenLineage events.
///
/// Two identities are equal iff both the namespace and name strings are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetIdentity {
    /// `{adapter}://{database}`, e.g. `duckdb://jaffle_shop`
    pub namespace: String,

    /// `{schema}.{table}`, e.g. `main.customers`
    pub name: String,
}

/// Physical storage coordinates extracted from a model node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    /// Database name
    pub database: String,

    /// Schema name
    pub schema: String,

    /// Table name (alias takes precedence over the logical name)
    pub table: String,
}

/// A model's resolved lineage: its own dataset plus its upstream datasets
#[derive(Debug, Clone)]
pub struct ModelLineage {
    /// Model unique id
    pub model_id: String,

    /// The dataset this model materializes
    pub output: DatasetIdentity,

    /// Upstream datasets referenced by the model
    pub inputs: Vec<DatasetIdentity>,
}

/// Resolve the dataset a test node validates.
///
/// Multi-reference tests resolve against their *first* referenced dataset
/// only. This drops lineage to the remaining refs; it is preserved as-is for
/// compatibility with existing consumers (known limitation).
pub fn resolve_test_dataset(node_id: &str, manifest: &Manifest) -> CoreResult<DatasetIdentity> {
    let test_node = manifest
        .get_node(node_id)
        .ok_or_else(|| CoreError::UnknownNode {
            node_id: node_id.to_string(),
        })?;

    let project = extract_project_name(node_id)?;
    let model_name = extract_ref_name(test_node, node_id)?;

    let model_id = format!("model.{project}.{model_name}");
    let model_node = manifest
        .get_node(&model_id)
        .ok_or_else(|| CoreError::UnknownModel {
            model_id: model_id.clone(),
            referenced_by: node_id.to_string(),
        })?;

    let location = extract_location(model_node, &model_id)?;
    Ok(identity_for(manifest, &location, None))
}

/// Resolve a model node's own dataset identity.
///
/// Used for lineage events on the run/build path. `namespace_override`
/// replaces the derived `{adapter}://{database}` namespace when set.
pub fn resolve_model_dataset(
    model_id: &str,
    manifest: &Manifest,
    namespace_override: Option<&str>,
) -> CoreResult<DatasetIdentity> {
    let model_node = manifest
        .get_node(model_id)
        .ok_or_else(|| CoreError::UnknownNode {
            node_id: model_id.to_string(),
        })?;

    let location = extract_location(model_node, model_id)?;
    Ok(identity_for(manifest, &location, namespace_override))
}

/// Resolve lineage for a set of executed models.
///
/// Inputs are the model's refs resolved within the same project. A model
/// whose own location cannot be resolved is skipped with a warning;
/// unresolvable inputs are likewise skipped rather than failing the batch.
pub fn resolve_model_lineage(
    manifest: &Manifest,
    model_ids: &[String],
    namespace_override: Option<&str>,
) -> Vec<ModelLineage> {
    let mut lineages = Vec::with_capacity(model_ids.len());

    for model_id in model_ids {
        let output = match resolve_model_dataset(model_id, manifest, namespace_override) {
            Ok(identity) => identity,
            Err(e) => {
                log::warn!("Skipping lineage for {model_id}: {e}");
                continue;
            }
        };

        let project = match extract_project_name(model_id) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Skipping lineage for {model_id}: {e}");
                continue;
            }
        };

        let mut inputs = Vec::new();
        if let Some(node) = manifest.get_node(model_id) {
            for r in &node.refs {
                let Some(ref_name) = r.name.as_deref() else {
                    continue;
                };
                let upstream_id = format!("model.{project}.{ref_name}");
                match resolve_model_dataset(&upstream_id, manifest, namespace_override) {
                    Ok(identity) => inputs.push(identity),
                    Err(e) => log::warn!("Skipping input {upstream_id} of {model_id}: {e}"),
                }
            }
        }

        lineages.push(ModelLineage {
            model_id: model_id.clone(),
            output,
            inputs,
        });
    }

    lineages
}

/// Owning project: second `.`-segment of a node unique id
/// (`<kind>.<project>.<rest>`)
fn extract_project_name(node_id: &str) -> CoreResult<&str> {
    node_id
        .split('.')
        .nth(1)
        .ok_or_else(|| CoreError::InvalidIdFormat {
            node_id: node_id.to_string(),
        })
}

/// Name of the first reference in a test node's refs list
fn extract_ref_name<'a>(node: &'a ManifestNode, node_id: &str) -> CoreResult<&'a str> {
    let first = node.refs.first().ok_or_else(|| CoreError::NoReference {
        node_id: node_id.to_string(),
    })?;

    first
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CoreError::UnnamedReference {
            node_id: node_id.to_string(),
        })
}

/// Extract database, schema, and table (alias over name) from a model node
fn extract_location(node: &ManifestNode, model_id: &str) -> CoreResult<DatasetLocation> {
    let database = require_field(node.database.as_deref(), "database", model_id)?;
    let schema = require_field(node.schema.as_deref(), "schema", model_id)?;
    // An empty alias counts as absent and falls back to the logical name
    let alias = node.alias.as_deref().filter(|a| !a.is_empty());
    let table = require_field(alias.or(node.name.as_deref()), "name", model_id)?;

    Ok(DatasetLocation {
        database: database.to_string(),
        schema: schema.to_string(),
        table: table.to_string(),
    })
}

fn require_field<'a>(value: Option<&'a str>, field: &str, model_id: &str) -> CoreResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::IncompleteLocation {
            model_id: model_id.to_string(),
            field: field.to_string(),
        })
}

fn identity_for(
    manifest: &Manifest,
    location: &DatasetLocation,
    namespace_override: Option<&str>,
) -> DatasetIdentity {
    let namespace = match namespace_override {
        Some(ns) => ns.to_string(),
        None => {
            let adapter = manifest.metadata.adapter_type.as_deref().unwrap_or("unknown");
            format!("{adapter}://{}", location.database)
        }
    };

    DatasetIdentity {
        namespace,
        name: format!("{}.{}", location.schema, location.table),
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
