use super::*;
use serde_json::json;

fn jaffle_shop_manifest() -> Value {
    json!({
        "nodes": {
            "model.jaffle_shop.customers": {
                "database": "jaffle_shop",
                "schema": "main",
                "name": "customers",
                "refs": [{"name": "stg_customers"}]
            },
            "model.jaffle_shop.stg_customers": {
                "database": "jaffle_shop",
                "schema": "main",
                "name": "stg_customers",
                "refs": []
            },
            "test.jaffle_shop.unique_customers_customer_id.c3a8b1": {
                "database": "jaffle_shop",
                "schema": "main_dbt_test__audit",
                "name": "unique_customers_customer_id",
                "refs": [{"name": "customers"}],
                "test_metadata": {
                    "name": "unique",
                    "kwargs": {"column_name": "customer_id"}
                }
            }
        },
        "sources": {
            "source.jaffle_shop.raw.raw_customers": {"schema": "raw"}
        },
        "metadata": {
            "adapter_type": "duckdb",
            "project_name": "jaffle_shop",
            "dbt_version": "1.10.15"
        }
    })
}

#[test]
fn test_parse_manifest() {
    let manifest = Manifest::parse(&jaffle_shop_manifest()).unwrap();

    assert_eq!(manifest.node_count(), 3);
    assert_eq!(manifest.sources.len(), 1);
    assert_eq!(manifest.metadata.adapter_type.as_deref(), Some("duckdb"));
    assert_eq!(
        manifest.metadata.project_name.as_deref(),
        Some("jaffle_shop")
    );

    let test_node = manifest
        .get_node("test.jaffle_shop.unique_customers_customer_id.c3a8b1")
        .unwrap();
    assert_eq!(test_node.refs[0].name.as_deref(), Some("customers"));
    let meta = test_node.test_metadata.as_ref().unwrap();
    assert_eq!(meta.name.as_deref(), Some("unique"));
    assert_eq!(meta.kwargs.column_name.as_deref(), Some("customer_id"));
}

#[test]
fn test_parse_manifest_missing_top_level_fields() {
    for absent in ["nodes", "sources", "metadata"] {
        let mut doc = jaffle_shop_manifest();
        doc.as_object_mut().unwrap().remove(absent);

        let err = Manifest::parse(&doc).unwrap_err();
        match err {
            CoreError::MissingField { field, file } => {
                assert_eq!(field, absent);
                assert_eq!(file, "manifest.json");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_manifest_no_per_node_validation() {
    // A node missing location fields still parses; validation happens in the
    // resolver, per node actually touched.
    let doc = json!({
        "nodes": {
            "model.proj.broken": {"name": "broken"}
        },
        "sources": {},
        "metadata": {}
    });
    let manifest = Manifest::parse(&doc).unwrap();
    let node = manifest.get_node("model.proj.broken").unwrap();
    assert!(node.database.is_none());
    assert!(node.schema.is_none());
    assert_eq!(node.name.as_deref(), Some("broken"));
    assert!(manifest.metadata.adapter_type.is_none());
}

#[test]
fn test_parse_manifest_alias_field() {
    let doc = json!({
        "nodes": {
            "model.proj.orders": {
                "database": "analytics",
                "schema": "prod",
                "name": "orders",
                "alias": "orders_final"
            }
        },
        "sources": {},
        "metadata": {}
    });
    let manifest = Manifest::parse(&doc).unwrap();
    let node = manifest.get_node("model.proj.orders").unwrap();
    assert_eq!(node.alias.as_deref(), Some("orders_final"));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, jaffle_shop_manifest().to_string()).unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.node_count(), 3);
}
