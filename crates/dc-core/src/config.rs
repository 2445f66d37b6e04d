//! Optional YAML config file (.dbt-correlator.yml)
//!
//! The config file supplies defaults below CLI flags and environment
//! variables; the CLI applies the precedence (CLI > env > config > default).
//! `${VAR}` references anywhere in the file are expanded from the
//! environment before parsing.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Default config file name, auto-discovered in the working directory
pub const CONFIG_FILE_NAME: &str = ".dbt-correlator.yml";

/// Parsed .dbt-correlator.yml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Correlator backend settings
    #[serde(default)]
    pub correlator: CorrelatorSection,

    /// dbt invocation settings
    #[serde(default)]
    pub dbt: DbtSection,

    /// OpenLineage job settings
    #[serde(default)]
    pub job: JobSection,
}

/// `correlator:` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelatorSection {
    /// OpenLineage API endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Namespace for emitted events
    #[serde(default)]
    pub namespace: Option<String>,

    /// API key sent as X-API-Key
    #[serde(default)]
    pub api_key: Option<String>,
}

/// `dbt:` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DbtSection {
    /// Path to the dbt project directory
    #[serde(default)]
    pub project_dir: Option<String>,

    /// Path to the dbt profiles directory
    #[serde(default)]
    pub profiles_dir: Option<String>,
}

/// `job:` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
    /// Job name override for emitted events
    #[serde(default)]
    pub name: Option<String>,
}

/// Load the config file.
///
/// With an explicit path, a missing file is an error; without one,
/// `.dbt-correlator.yml` is looked up in the current directory and its
/// absence yields `Ok(None)`.
pub fn load_config(explicit_path: Option<&Path>) -> CoreResult<Option<FileConfig>> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(CoreError::ConfigNotFound {
                    path: p.display().to_string(),
                });
            }
            p.to_path_buf()
        }
        None => {
            let discovered = Path::new(CONFIG_FILE_NAME);
            if !discovered.exists() {
                return Ok(None);
            }
            discovered.to_path_buf()
        }
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let expanded = expand_env_vars(&raw);

    let config: FileConfig =
        serde_yaml::from_str(&expanded).map_err(|e| CoreError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(Some(config))
}

/// Expand `${VAR}` references from the environment; unset vars become ""
fn expand_env_vars(raw: &str) -> String {
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid literal regex");
    pattern
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
