//! Build command implementation
//!
//! Wraps `dbt build`, whose run_results mixes model and test nodes. Lineage
//! events cover the model rows; quality events cover the test rows; all of
//! them share one run id.

use anyhow::Result;
use chrono::Utc;
use dc_core::grouping::{executed_models, execution_stats, group_tests_by_dataset};
use dc_core::resolver::resolve_model_lineage;
use dc_core::run_results::RunResults;
use dc_events::builder::{lineage_events, quality_events};
use uuid::Uuid;

use crate::cli::{BuildArgs, GlobalArgs};
use crate::commands::common;
use crate::dbt;

/// Execute the build command
pub async fn execute(args: &BuildArgs, global: &GlobalArgs) -> Result<()> {
    let settings = common::resolve_settings(global)?;
    let run_id = Uuid::new_v4().to_string();
    let job_name = common::resolve_job_name(&settings, "build");

    println!("Correlating dbt build (run {run_id})");

    let start = common::start_event(&run_id, &job_name, &settings.job_namespace);
    common::emit_or_warn(&[start], &settings, "START event").await;

    let dbt_exit = if global.skip_dbt_run {
        println!("Skipping dbt execution (--skip-dbt-run)");
        0
    } else {
        match dbt::run_dbt(
            "build",
            &settings.project_dir,
            &settings.profiles_dir,
            &args.dbt_args,
        )
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

    // Only test rows become assertions; model rows report "success", which
    // is not a test status
    let test_results = RunResults {
        metadata: run_results.metadata.clone(),
        results: run_results
            .results
            .iter()
            .filter(|r| r.unique_id.starts_with("test."))
            .cloned()
            .collect(),
    };
    // Quality events carry the artifact's own timestamp
    let grouped = group_tests_by_dataset(&test_results, &manifest);
    events.extend(quality_events(
        &grouped,
        &settings.job_namespace,
        &job_name,
        &run_id,
        run_results.metadata.generated_at,
    ));

    events.push(common::terminal_event(
        &run_id,
        &job_name,
        &settings.job_namespace,
        dbt_exit,
    ));

    if common::emit_or_warn(&events, &settings, "build events").await {
        println!(
            "Emitted {} events ({} models, {} dataset groups)",
            events.len(),
            lineages.len(),
            grouped.len()
        );
    }

    if dbt_exit != 0 {
        std::process::exit(dbt_exit);
    }
    Ok(())
}
