use super::*;
use chrono::TimeZone;

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
}

fn outcome(test_name: &str, status: &str, column: Option<&str>) -> TestOutcome {
    TestOutcome {
        unique_id: format!("test.jaffle_shop.{test_name}.abc"),
        status: status.to_string(),
        failures: None,
        message: None,
        test_name: test_name.to_string(),
        column_name: column.map(String::from),
    }
}

fn dataset(name: &str) -> DatasetIdentity {
    DatasetIdentity {
        namespace: "duckdb://jaffle_shop".to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_map_test_status() {
    assert!(map_test_status("pass"));
    assert!(map_test_status("PASS"));
    assert!(map_test_status("Pass"));

    for status in ["fail", "error", "skipped", "warn", "success", "", "passed"] {
        assert!(!map_test_status(status), "{status:?} should map to false");
    }
}

#[test]
fn test_wrapping_event() {
    let event = wrapping_event(
        RunEventType::Start,
        "11111111-2222-3333-4444-555555555555",
        "jaffle_shop.test",
        "dbt",
        ts(),
    );

    assert_eq!(event.event_type, RunEventType::Start);
    assert_eq!(event.run.run_id, "11111111-2222-3333-4444-555555555555");
    assert_eq!(event.job.namespace, "dbt");
    assert_eq!(event.job.name, "jaffle_shop.test");
    assert!(event.inputs.is_empty());
    assert!(event.outputs.is_empty());
    assert!(event.event_time.starts_with("2025-01-15T10:30:00"));
    assert_eq!(event.producer, PRODUCER);

    // Terminal kinds are accepted uniformly
    let fail = wrapping_event(RunEventType::Fail, "r", "j", "dbt", ts());
    assert_eq!(fail.event_type, RunEventType::Fail);
}

#[test]
fn test_quality_events_one_per_dataset_group() {
    let grouped = vec![
        (
            dataset("main.customers"),
            vec![
                outcome("unique", "pass", Some("customer_id")),
                outcome("not_null", "fail", Some("customer_id")),
            ],
        ),
        (
            dataset("main.orders"),
            vec![outcome("accepted_values", "pass", Some("status"))],
        ),
    ];

    let events = quality_events(&grouped, "dbt", "jaffle_shop.test", "run-1", ts());

    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event.event_type, RunEventType::Complete);
        assert_eq!(event.run.run_id, "run-1");
        assert_eq!(event.inputs.len(), 1);
        assert!(event.outputs.is_empty());
    }

    let first = &events[0].inputs[0];
    assert_eq!(first.name, "main.customers");
    let assertions = &first
        .input_facets
        .as_ref()
        .unwrap()
        .data_quality_assertions
        .assertions;
    assert_eq!(assertions.len(), 2);
    // Input order and success mapping preserved
    assert_eq!(assertions[0].assertion, "unique(customer_id)");
    assert!(assertions[0].success);
    assert_eq!(assertions[1].assertion, "not_null(customer_id)");
    assert!(!assertions[1].success);

    assert_eq!(events[1].inputs[0].name, "main.orders");
}

#[test]
fn test_quality_assertion_label_without_column() {
    let grouped = vec![(
        dataset("main.customers"),
        vec![outcome("unknown_test", "pass", None)],
    )];

    let events = quality_events(&grouped, "dbt", "j", "run-1", ts());
    let assertion = &events[0].inputs[0]
        .input_facets
        .as_ref()
        .unwrap()
        .data_quality_assertions
        .assertions[0];
    assert_eq!(assertion.assertion, "unknown_test");
    assert!(assertion.column.is_none());
}

#[test]
fn test_lineage_events_with_and_without_stats() {
    let lineages = vec![
        ModelLineage {
            model_id: "model.jaffle_shop.orders".to_string(),
            output: dataset("main.orders"),
            inputs: vec![dataset("staging.stg_orders")],
        },
        ModelLineage {
            model_id: "model.jaffle_shop.customers".to_string(),
            output: dataset("main.customers"),
            inputs: vec![],
        },
    ];
    let mut stats = HashMap::new();
    stats.insert(
        "model.jaffle_shop.orders".to_string(),
        ExecutionStats {
            row_count: Some(99),
            duration_secs: 1.25,
        },
    );

    let events = lineage_events(&lineages, &stats, "run-1", "dbt", "jaffle_shop.run", ts());

    assert_eq!(events.len(), 2);

    let orders = &events[0];
    assert_eq!(orders.inputs.len(), 1);
    assert_eq!(orders.inputs[0].name, "staging.stg_orders");
    assert!(orders.inputs[0].input_facets.is_none());
    assert_eq!(orders.outputs[0].name, "main.orders");
    assert_eq!(
        orders.outputs[0]
            .output_facets
            .as_ref()
            .unwrap()
            .output_statistics
            .row_count,
        Some(99)
    );

    // A model without stats still carries the facet, with no row count
    let customers = &events[1];
    assert_eq!(
        customers.outputs[0]
            .output_facets
            .as_ref()
            .unwrap()
            .output_statistics
            .row_count,
        None
    );
}

#[test]
fn test_all_events_share_run_id() {
    let grouped = vec![(
        dataset("main.customers"),
        vec![outcome("unique", "pass", None)],
    )];
    let run_id = "33333333-2222-3333-4444-555555555555";

    let start = wrapping_event(RunEventType::Start, run_id, "j", "dbt", ts());
    let quality = quality_events(&grouped, "dbt", "j", run_id, ts());
    let terminal = wrapping_event(RunEventType::Complete, run_id, "j", "dbt", ts());

    assert_eq!(start.run.run_id, run_id);
    assert_eq!(quality[0].run.run_id, run_id);
    assert_eq!(terminal.run.run_id, run_id);
}
