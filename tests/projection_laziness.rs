//! Lazy projection / materialization tests
//!
//! - A query yields Projected instances; reading indexed columns costs
//!   zero blob decodes
//! - The first deep-field access promotes exactly once, observable on the
//!   decode counter
//! - After promotion, every field matches what read_by_id returns
//! - A partially-consumed query holds nothing and owes nothing

use driftstore::document::DocumentValue;
use driftstore::migration::MigrationRegistry;
use driftstore::projection::ColumnSpec;
use driftstore::store::{
    ColumnPredicate, MemoryBackend, ObjectStore, ObjectStoreConfig, ProjectionState, QueryFilter,
};
use std::sync::Arc;

fn test_store() -> ObjectStore {
    ObjectStore::open(
        ObjectStoreConfig::new(
            1,
            vec![
                ColumnSpec::field("name"),
                ColumnSpec::new("city", "address.city"),
                ColumnSpec::field("age"),
            ],
        ),
        MigrationRegistry::builder(),
        Arc::new(MemoryBackend::new()),
    )
    .unwrap()
}

fn person(name: &str, city: &str, age: i64) -> DocumentValue {
    let mut doc = DocumentValue::empty_map();
    doc.set("name", name.into());
    doc.set("address.city", city.into());
    doc.set("address.street", "12 Marina Rd".into());
    doc.set("age", DocumentValue::Int(age));
    doc.set("bio", "long text that only a full load should pay for".into());
    doc
}

fn seeded_store() -> ObjectStore {
    let store = test_store();
    store.create("p1", person("Alice", "Lagos", 34)).unwrap();
    store.create("p2", person("Bob", "Accra", 41)).unwrap();
    store.create("p3", person("Chidi", "Lagos", 28)).unwrap();
    store
}

// =============================================================================
// The cheap path
// =============================================================================

#[test]
fn test_query_streams_projected_instances() {
    let store = seeded_store();
    let results: Vec<_> = store
        .read_by_query(&QueryFilter::equals("city", "Lagos"))
        .unwrap()
        .collect();

    assert_eq!(results.len(), 2);
    for instance in &results {
        assert_eq!(instance.state(), ProjectionState::Projected);
    }
}

#[test]
fn test_indexed_reads_cost_zero_decodes() {
    let store = seeded_store();
    let decodes_before = store.metrics().blob_decodes();

    for instance in store.read_by_query(&QueryFilter::all()).unwrap() {
        let _ = instance.indexed_column("name");
        let _ = instance.indexed_column("city");
        let _ = instance.indexed_column("age");
    }

    assert_eq!(
        store.metrics().blob_decodes(),
        decodes_before,
        "indexed-column reads must never touch the blob"
    );
}

#[test]
fn test_range_filter_over_indexed_columns() {
    let store = seeded_store();
    let names: Vec<String> = store
        .read_by_query(
            &QueryFilter::all().with("age", ColumnPredicate::GreaterThan(30i64.into())),
        )
        .unwrap()
        .filter_map(|i| i.indexed_column("name").and_then(|v| v.as_str()).map(String::from))
        .collect();

    assert_eq!(names, ["Alice", "Bob"]);
}

// =============================================================================
// Promotion
// =============================================================================

#[test]
fn test_deep_read_promotes_exactly_once() {
    let store = seeded_store();
    let decodes_before = store.metrics().blob_decodes();

    let mut instance = store
        .read_by_query(&QueryFilter::equals("name", "Alice"))
        .unwrap()
        .next()
        .unwrap();

    // Deep field: not mirrored into any indexed column
    let street = instance.field("address.street").unwrap().cloned();
    assert_eq!(
        street.and_then(|v| v.as_str().map(String::from)),
        Some("12 Marina Rd".into())
    );
    assert_eq!(instance.state(), ProjectionState::Materialized);
    assert_eq!(store.metrics().blob_decodes(), decodes_before + 1);

    // Subsequent deep reads and explicit promotes are free
    let _ = instance.field("bio").unwrap();
    instance.promote().unwrap();
    assert_eq!(store.metrics().blob_decodes(), decodes_before + 1);
}

#[test]
fn test_field_write_promotes_before_proceeding() {
    let store = seeded_store();
    let mut instance = store
        .read_by_query(&QueryFilter::equals("name", "Alice"))
        .unwrap()
        .next()
        .unwrap();
    assert_eq!(instance.state(), ProjectionState::Projected);

    instance.set_field("age", DocumentValue::Int(35)).unwrap();
    assert_eq!(
        instance.state(),
        ProjectionState::Materialized,
        "a write must never proceed against a partial view"
    );
    // The full document is intact around the mutation
    assert_eq!(
        instance.document().and_then(|d| d.get("bio")).map(|v| v.type_name()),
        Some("text")
    );
}

#[test]
fn test_promoted_instance_matches_read_by_id() {
    let store = seeded_store();
    let mut projected = store
        .read_by_query(&QueryFilter::equals("name", "Bob"))
        .unwrap()
        .next()
        .unwrap();
    projected.promote().unwrap();

    let by_id = store.read_by_id(projected.id()).unwrap();
    assert_eq!(projected.document(), by_id.document());
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_consumer_may_stop_pulling_at_any_point() {
    let store = seeded_store();
    let decodes_before = store.metrics().blob_decodes();

    let mut results = store.read_by_query(&QueryFilter::all()).unwrap();
    let first = results.next().unwrap();
    assert_eq!(first.state(), ProjectionState::Projected);
    drop(results);

    assert_eq!(
        store.metrics().blob_decodes(),
        decodes_before,
        "abandoning a query must not trigger decodes or cleanup work"
    );
}
