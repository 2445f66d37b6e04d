//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// dbt-correlator - wrap dbt commands and emit OpenLineage events
#[derive(Parser, Debug)]
#[command(name = "dbt-correlator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to a .dbt-correlator.yml config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the dbt project directory
    #[arg(long, global = true)]
    pub project_dir: Option<String>,

    /// Path to the dbt profiles directory
    #[arg(long, global = true)]
    pub profiles_dir: Option<String>,

    /// Correlator backend URL to POST events to
    #[arg(long, global = true, env = "CORRELATOR_ENDPOINT")]
    pub correlator_endpoint: Option<String>,

    /// OpenLineage job namespace
    #[arg(long, global = true, env = "OPENLINEAGE_NAMESPACE")]
    pub openlineage_namespace: Option<String>,

    /// API key sent as the X-API-Key header
    #[arg(long, global = true, env = "CORRELATOR_API_KEY")]
    pub correlator_api_key: Option<String>,

    /// Override the OpenLineage job name
    #[arg(long, global = true)]
    pub job_name: Option<String>,

    /// Skip the dbt invocation and correlate existing artifacts
    #[arg(long, global = true)]
    pub skip_dbt_run: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run `dbt test` and emit data-quality events
    Test(TestArgs),

    /// Run `dbt run` and emit model lineage events
    Run(RunArgs),

    /// Run `dbt build` and emit lineage plus data-quality events
    Build(BuildArgs),
}

/// Arguments for the test command
#[derive(Args, Debug, Default)]
pub struct TestArgs {
    /// Extra arguments passed through to dbt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub dbt_args: Vec<String>,
}

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Dataset namespace override for emitted lineage
    #[arg(long, env = "DBT_CORRELATOR_NAMESPACE")]
    pub dataset_namespace: Option<String>,

    /// Extra arguments passed through to dbt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub dbt_args: Vec<String>,
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Dataset namespace override for emitted lineage
    #[arg(long, env = "DBT_CORRELATOR_NAMESPACE")]
    pub dataset_namespace: Option<String>,

    /// Extra arguments passed through to dbt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub dbt_args: Vec<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
