use super::*;
use serde_json::json;

fn manifest() -> Manifest {
    Manifest::parse(&json!({
        "nodes": {
            "model.jaffle_shop.customers": {
                "database": "jaffle_shop",
                "schema": "main",
                "name": "customers"
            },
            "model.jaffle_shop.orders": {
                "database": "jaffle_shop",
                "schema": "main",
                "name": "orders"
            },
            "test.jaffle_shop.unique_customers_customer_id.a1": {
                "refs": [{"name": "customers"}],
                "test_metadata": {"name": "unique", "kwargs": {"column_name": "customer_id"}}
            },
            "test.jaffle_shop.not_null_customers_customer_id.a2": {
                "refs": [{"name": "customers"}],
                "test_metadata": {"name": "not_null", "kwargs": {"column_name": "customer_id"}}
            },
            "test.jaffle_shop.accepted_values_orders_status.a3": {
                "refs": [{"name": "orders"}],
                "test_metadata": {"name": "accepted_values", "kwargs": {"column_name": "status"}}
            },
            "test.jaffle_shop.no_refs.a4": {
                "refs": []
            }
        },
        "sources": {},
        "metadata": {"adapter_type": "duckdb", "project_name": "jaffle_shop"}
    }))
    .unwrap()
}

fn run_results(entries: serde_json::Value) -> RunResults {
    RunResults::parse(&json!({
        "metadata": {
            "generated_at": "2025-01-15T10:30:00Z",
            "invocation_id": "inv-1",
            "dbt_version": "1.10.15"
        },
        "results": entries
    }))
    .unwrap()
}

#[test]
fn test_group_tests_by_dataset() {
    let results = run_results(json!([
        {"unique_id": "test.jaffle_shop.unique_customers_customer_id.a1", "status": "pass"},
        {"unique_id": "test.jaffle_shop.accepted_values_orders_status.a3", "status": "fail"},
        {"unique_id": "test.jaffle_shop.not_null_customers_customer_id.a2", "status": "pass"}
    ]));

    let grouped = group_tests_by_dataset(&results, &manifest());

    assert_eq!(grouped.len(), 2);
    // First-appearance order: customers then orders
    assert_eq!(grouped[0].0.name, "main.customers");
    assert_eq!(grouped[1].0.name, "main.orders");
    assert_eq!(grouped[0].1.len(), 2);
    assert_eq!(grouped[1].1.len(), 1);

    let first = &grouped[0].1[0];
    assert_eq!(first.test_name, "unique");
    assert_eq!(first.column_name.as_deref(), Some("customer_id"));
    assert_eq!(first.status, "pass");
}

#[test]
fn test_group_skips_unknown_nodes() {
    let results = run_results(json!([
        {"unique_id": "test.jaffle_shop.not_in_manifest.zz", "status": "pass"},
        {"unique_id": "test.jaffle_shop.unique_customers_customer_id.a1", "status": "pass"}
    ]));

    let grouped = group_tests_by_dataset(&results, &manifest());
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].1.len(), 1);
}

#[test]
fn test_group_skips_unresolvable_tests() {
    // no_refs.a4 exists in the manifest but cannot resolve to a dataset
    let results = run_results(json!([
        {"unique_id": "test.jaffle_shop.no_refs.a4", "status": "pass"},
        {"unique_id": "test.jaffle_shop.unique_customers_customer_id.a1", "status": "fail"}
    ]));

    let grouped = group_tests_by_dataset(&results, &manifest());
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].1[0].status, "fail");
}

#[test]
fn test_group_defaults_test_name_when_metadata_absent() {
    let m = Manifest::parse(&json!({
        "nodes": {
            "model.jaffle_shop.customers": {
                "database": "jaffle_shop",
                "schema": "main",
                "name": "customers"
            },
            "test.jaffle_shop.singular_check.a9": {
                "refs": [{"name": "customers"}]
            }
        },
        "sources": {},
        "metadata": {"adapter_type": "duckdb"}
    }))
    .unwrap();

    let results = run_results(json!([
        {"unique_id": "test.jaffle_shop.singular_check.a9", "status": "pass"}
    ]));

    let grouped = group_tests_by_dataset(&results, &m);
    assert_eq!(grouped[0].1[0].test_name, "unknown_test");
    assert!(grouped[0].1[0].column_name.is_none());
}

#[test]
fn test_executed_models_in_input_order() {
    let results = run_results(json!([
        {"unique_id": "model.jaffle_shop.orders", "status": "success"},
        {"unique_id": "test.jaffle_shop.unique_customers_customer_id.a1", "status": "pass"},
        {"unique_id": "model.jaffle_shop.customers", "status": "success"}
    ]));

    assert_eq!(
        executed_models(&results),
        vec![
            "model.jaffle_shop.orders".to_string(),
            "model.jaffle_shop.customers".to_string()
        ]
    );
}

#[test]
fn test_execution_stats_rows_affected() {
    let results = run_results(json!([
        {
            "unique_id": "model.jaffle_shop.orders",
            "status": "success",
            "execution_time": 1.25,
            "adapter_response": {"_message": "OK", "rows_affected": 99}
        },
        {
            "unique_id": "model.jaffle_shop.customers",
            "status": "success",
            "execution_time": 0.5,
            "adapter_response": {"_message": "OK"}
        }
    ]));

    let stats = execution_stats(&results);
    let orders = &stats["model.jaffle_shop.orders"];
    assert_eq!(orders.row_count, Some(99));
    assert_eq!(orders.duration_secs, 1.25);

    let customers = &stats["model.jaffle_shop.customers"];
    assert_eq!(customers.row_count, None);
}
