//! Reading dbt artifact files from the project's target directory

use crate::error::{CoreError, CoreResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Path to run_results.json inside a dbt project directory
pub fn run_results_path(project_dir: &Path) -> PathBuf {
    project_dir.join("target").join("run_results.json")
}

/// Path to manifest.json inside a dbt project directory
pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join("target").join("manifest.json")
}

/// Read and JSON-decode an artifact file.
///
/// Fails with `ArtifactNotFound` when no file exists at `path` and with
/// `ArtifactMalformed` when the bytes are not valid JSON. Never returns a
/// partial document.
pub fn read_artifact(path: &Path) -> CoreResult<Value> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if !path.exists() {
        return Err(CoreError::ArtifactNotFound {
            path: path.display().to_string(),
            filename,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| CoreError::ArtifactMalformed {
        path: path.display().to_string(),
        filename,
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "artifacts_test.rs"]
mod tests;
