use super::*;
use crate::error::CoreError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_read_artifact_valid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run_results.json");
    fs::write(&path, r#"{"metadata": {"dbt_version": "1.10.15"}}"#).unwrap();

    let value = read_artifact(&path).unwrap();
    assert_eq!(value["metadata"]["dbt_version"], "1.10.15");
}

#[test]
fn test_read_artifact_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run_results.json");

    let err = read_artifact(&path).unwrap_err();
    match &err {
        CoreError::ArtifactNotFound { path: p, filename } => {
            assert!(p.ends_with("run_results.json"));
            assert_eq!(filename, "run_results.json");
        }
        other => panic!("expected ArtifactNotFound, got {other:?}"),
    }
    // The message must name both the file and the full path so a human can
    // run dbt and retry.
    let msg = err.to_string();
    assert!(msg.contains("run_results.json"));
    assert!(msg.contains(dir.path().to_str().unwrap()));
}

#[test]
fn test_read_artifact_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    fs::write(&path, "{not valid json").unwrap();

    let err = read_artifact(&path).unwrap_err();
    match err {
        CoreError::ArtifactMalformed { path: p, .. } => {
            assert!(p.ends_with("manifest.json"));
        }
        other => panic!("expected ArtifactMalformed, got {other:?}"),
    }
}

#[test]
fn test_artifact_path_helpers() {
    let project = Path::new("/work/jaffle_shop");
    assert_eq!(
        run_results_path(project),
        PathBuf::from("/work/jaffle_shop/target/run_results.json")
    );
    assert_eq!(
        manifest_path(project),
        PathBuf::from("/work/jaffle_shop/target/manifest.json")
    );
}
