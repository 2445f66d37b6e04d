//! dc-core - Core library for dbt-correlator
//!
//! This crate provides dbt artifact reading and parsing (run_results.json,
//! manifest.json), dataset resolution, result grouping, and config file
//! loading shared by the dbt-correlator components.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod grouping;
pub mod manifest;
pub mod resolver;
pub mod run_results;

pub use artifacts::{manifest_path, read_artifact, run_results_path};
pub use config::{load_config, FileConfig, CONFIG_FILE_NAME};
pub use error::{CoreError, CoreResult};
pub use grouping::{
    execution_stats, executed_models, group_tests_by_dataset, ExecutionStats, TestOutcome,
};
pub use manifest::{Manifest, ManifestMetadata, ManifestNode, NodeRef, TestMetadata};
pub use resolver::{
    resolve_model_dataset, resolve_model_lineage, resolve_test_dataset, DatasetIdentity,
    DatasetLocation, ModelLineage,
};
pub use run_results::{NodeResult, RunMetadata, RunResults};
