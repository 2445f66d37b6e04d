//! dbt-correlator CLI - wraps dbt commands and emits OpenLineage events

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod dbt;

use cli::Cli;
use commands::{build, run, test};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Test(args) => test::execute(args, &cli.global).await,
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Build(args) => build::execute(args, &cli.global).await,
    }
}
