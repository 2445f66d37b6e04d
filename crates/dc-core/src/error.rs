//! Error types for dc-core

use thiserror::Error;

/// Core error type for dbt-correlator
#[derive(Error, Debug)]
pub enum CoreError {
    /// A001: Artifact file not found on disk
    #[error("[A001] {filename} not found at path: {path}. Ensure dbt has run and generated the {filename} file.")]
    ArtifactNotFound { path: String, filename: String },

    /// A002: Artifact file is not valid JSON
    #[error("[A002] Failed to parse {filename}: invalid JSON at {path}. Error: {message}")]
    ArtifactMalformed {
        path: String,
        filename: String,
        message: String,
    },

    /// A003: Required field missing from an artifact
    #[error("[A003] Missing required field '{field}' in {file}. File may be corrupted or from an unsupported dbt version.")]
    MissingField { field: String, file: String },

    /// A004: Timestamp field is present but not parseable as ISO-8601
    #[error("[A004] Invalid timestamp in field '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },

    /// R001: Test node not present in the manifest node map
    #[error("[R001] Test node not found in manifest: {node_id}. Ensure manifest.json is up-to-date with the test run.")]
    UnknownNode { node_id: String },

    /// R002: Node identifier does not have the `<kind>.<project>.<rest>` shape
    #[error("[R002] Invalid node unique_id format: {node_id}. Expected format: <kind>.<project>.<name>")]
    InvalidIdFormat { node_id: String },

    /// R003: Test node has an empty reference list
    #[error("[R003] Test node has no refs: {node_id}. Cannot determine which dataset the test is validating.")]
    NoReference { node_id: String },

    /// R004: Test node's first reference carries no name
    #[error("[R004] Test node ref has no name: {node_id}. Cannot resolve model reference.")]
    UnnamedReference { node_id: String },

    /// R005: Referenced model not present in the manifest node map
    #[error("[R005] Model node not found in manifest: {model_id}. Referenced by: {referenced_by}")]
    UnknownModel {
        model_id: String,
        referenced_by: String,
    },

    /// R006: Model node is missing a location component
    #[error("[R006] Model node missing required field '{field}': {model_id}")]
    IncompleteLocation { model_id: String, field: String },

    /// C001: Config file not found at an explicitly provided path
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Config file is not valid YAML
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// IO error with file path context
    #[error("Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
