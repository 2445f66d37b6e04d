//! Shared workflow plumbing: settings resolution, artifact loading, emission

use anyhow::{bail, Context, Result};
use chrono::Utc;
use dc_core::artifacts::{manifest_path, run_results_path};
use dc_core::config::{load_config, FileConfig};
use dc_core::manifest::Manifest;
use dc_core::run_results::RunResults;
use dc_events::builder::wrapping_event;
use dc_events::emitter::emit_events;
use dc_events::event::{RunEvent, RunEventType};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;
use crate::dbt::expand_tilde;

/// Effective settings after merging CLI flags, env vars, the config file,
/// and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    /// Correlator backend URL
    pub endpoint: String,

    /// OpenLineage job namespace
    pub job_namespace: String,

    /// API key for the X-API-Key header
    pub api_key: Option<String>,

    /// dbt project directory
    pub project_dir: PathBuf,

    /// dbt profiles directory, tilde-expanded
    pub profiles_dir: PathBuf,

    /// Explicit job name override
    pub job_name: Option<String>,
}

/// Merge settings in precedence order: CLI flag or env var (clap resolves
/// those two), then the config file, then the built-in default.
pub fn resolve_settings(global: &GlobalArgs) -> Result<Settings> {
    let config = load_config(global.config.as_deref().map(Path::new))
        .context("Failed to load configuration")?
        .unwrap_or_default();

    Ok(Settings {
        endpoint: resolve_endpoint(global, &config)?,
        job_namespace: global
            .openlineage_namespace
            .clone()
            .or_else(|| config.correlator.namespace.clone())
            .unwrap_or_else(|| "dbt".to_string()),
        api_key: global
            .correlator_api_key
            .clone()
            .or_else(|| config.correlator.api_key.clone()),
        project_dir: PathBuf::from(
            global
                .project_dir
                .clone()
                .or_else(|| config.dbt.project_dir.clone())
                .unwrap_or_else(|| ".".to_string()),
        ),
        profiles_dir: PathBuf::from(expand_tilde(
            &global
                .profiles_dir
                .clone()
                .or_else(|| config.dbt.profiles_dir.clone())
                .unwrap_or_else(|| "~/.dbt".to_string()),
        )),
        job_name: global.job_name.clone().or_else(|| config.job.name.clone()),
    })
}

fn resolve_endpoint(global: &GlobalArgs, config: &FileConfig) -> Result<String> {
    match global
        .correlator_endpoint
        .clone()
        .or_else(|| config.correlator.endpoint.clone())
    {
        Some(endpoint) => Ok(endpoint),
        None => bail!(
            "No correlator endpoint configured. \
             Pass --correlator-endpoint, set CORRELATOR_ENDPOINT, \
             or add correlator.endpoint to .dbt-correlator.yml"
        ),
    }
}

/// Resolve the OpenLineage job name for a command.
///
/// Explicit override wins; otherwise `{project_name}.<cmd>` from a manifest
/// already on disk, falling back to `dbt.<cmd>` when no manifest exists yet.
pub fn resolve_job_name(settings: &Settings, command: &str) -> String {
    if let Some(name) = &settings.job_name {
        return name.clone();
    }

    let project = Manifest::load(&manifest_path(&settings.project_dir))
        .ok()
        .and_then(|m| m.metadata.project_name);

    match project {
        Some(project) => format!("{project}.{command}"),
        None => format!("dbt.{command}"),
    }
}

/// Load both dbt artifacts. Failures here are fatal to the invocation and
/// the error names the artifact that could not be read.
pub fn load_artifacts(project_dir: &Path) -> Result<(RunResults, Manifest)> {
    let run_results = RunResults::load(&run_results_path(project_dir))
        .context("Failed to parse run_results.json")?;
    let manifest =
        Manifest::load(&manifest_path(project_dir)).context("Failed to parse manifest.json")?;
    Ok((run_results, manifest))
}

/// Build the START event that opens a run.
pub fn start_event(run_id: &str, job_name: &str, namespace: &str) -> RunEvent {
    wrapping_event(RunEventType::Start, run_id, job_name, namespace, Utc::now())
}

/// Build the terminal event: COMPLETE iff the wrapped dbt process exited 0.
pub fn terminal_event(run_id: &str, job_name: &str, namespace: &str, dbt_exit: i32) -> RunEvent {
    let kind = if dbt_exit == 0 {
        RunEventType::Complete
    } else {
        RunEventType::Fail
    };
    wrapping_event(kind, run_id, job_name, namespace, Utc::now())
}

/// Emit a batch, downgrading any failure to a warning. Correlation is
/// fire-and-forget; the dbt exit code is the only thing the caller reports.
/// Returns whether the batch was delivered so callers can gate their
/// success message.
pub async fn emit_or_warn(events: &[RunEvent], settings: &Settings, what: &str) -> bool {
    match emit_events(events, &settings.endpoint, settings.api_key.as_deref()).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: failed to emit {what}: {e}");
            false
        }
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
