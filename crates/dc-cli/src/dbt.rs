//! dbt subprocess runner
//!
//! dbt keeps its own stdout/stderr so the user sees its output live. A
//! non-zero dbt exit is an ordinary outcome here, not an error; the caller
//! forwards it as the process exit code.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Subprocess launch failure
#[derive(Error, Debug)]
pub enum DbtError {
    /// The dbt binary is not on PATH
    #[error("dbt executable not found. Install dbt, or use --skip-dbt-run with existing artifacts")]
    MissingExecutable,

    /// Any other spawn or wait failure
    #[error("failed to run dbt: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Run `dbt <command>` against the given project and profiles directories,
/// appending any passthrough arguments. Returns dbt's exit code.
pub async fn run_dbt(
    command: &str,
    project_dir: &Path,
    profiles_dir: &Path,
    extra_args: &[String],
) -> Result<i32, DbtError> {
    let mut cmd = Command::new("dbt");
    cmd.arg(command)
        .arg("--project-dir")
        .arg(project_dir)
        .arg("--profiles-dir")
        .arg(profiles_dir);
    for arg in extra_args {
        cmd.arg(arg);
    }

    log::debug!("Running dbt {command} in {}", project_dir.display());

    let status = cmd.status().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DbtError::MissingExecutable
        } else {
            DbtError::Spawn(e)
        }
    })?;

    // A killed process has no code; report it as failure
    Ok(status.code().unwrap_or(1))
}

/// Expand a leading `~/` against `$HOME`. Paths without the prefix pass
/// through unchanged, as does `~/...` when `$HOME` is unset.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return format!("{home}/{rest}");
        }
    }
    path.to_string()
}

#[cfg(test)]
#[path = "dbt_test.rs"]
mod tests;
