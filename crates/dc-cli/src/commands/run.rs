//! Run command implementation
//!
//! Wraps `dbt run` and emits one lineage event per executed model, with
//! outputStatistics taken from the adapter response.

use anyhow::Result;
use chrono::Utc;
use dc_core::grouping::{executed_models, execution_stats};
use dc_core::resolver::resolve_model_lineage;
use dc_events::builder::lineage_events;
use uuid::Uuid;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common;
use crate::dbt;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let settings = common::resolve_settings(global)?;
    let run_id = Uuid::new_v4().to_string();
    let job_name = common::resolve_job_name(&settings, "run");

    println!("Correlating dbt run (run {run_id})");

    let start = common::start_event(&run_id, &job_name, &settings.job_namespace);
    common::emit_or_warn(&[start], &settings, "START event").await;

    let dbt_exit = if global.skip_dbt_run {
        println!("Skipping dbt execution (--skip-dbt-run)");
        0
    } else {
        match dbt::run_dbt("run", &settings.project_dir, &settings.profiles_dir, &args.dbt_args)
            .await
        {
            Ok(code) => code,
            Err(dbt::DbtError::MissingExecutable) => {
                eprintln!("Error: {}", dbt::DbtError::MissingExecutable);
                std::process::exit(127);
            }
            Err(e) => return Err(e.into()),
        }
    };

    let (run_results, manifest) = common::load_artifacts(&settings.project_dir)?;

    let models = executed_models(&run_results);
    let lineages = resolve_model_lineage(&manifest, &models, args.dataset_namespace.as_deref());
    let stats = execution_stats(&run_results);

    let mut events = lineage_events(
        &lineages,
        &stats,
        &run_id,
        &settings.job_namespace,
        &job_name,
        Utc::now(),
    );
    events.push(common::terminal_event(
        &run_id,
        &job_name,
        &settings.job_namespace,
        dbt_exit,
    ));

    if common::emit_or_warn(&events, &settings, "lineage events").await {
        println!(
            "Emitted {} events ({} of {} executed models resolved)",
            events.len(),
            lineages.len(),
            models.len()
        );
    }

    if dbt_exit != 0 {
        std::process::exit(dbt_exit);
    }
    Ok(())
}
