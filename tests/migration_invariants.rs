//! Migration chain invariant tests
//!
//! - The chain must be contiguous from any historical version to the
//!   supported version; a gap is a construction failure, never a runtime
//!   surprise
//! - Steps are applied strictly in order, each consuming the previous
//!   step's output
//! - Migrating a document already at the target is a no-op

use driftstore::document::DocumentValue;
use driftstore::migration::{MigrationError, MigrationFn, MigrationRegistry};
use driftstore::store::{MemoryBackend, ObjectStore, ObjectStoreConfig, StoreError};
use std::sync::Arc;

fn append_marker(marker: &'static str) -> MigrationFn {
    Box::new(move |mut doc: DocumentValue| {
        let trail = doc
            .get("trail")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        doc.set("trail", format!("{}{}", trail, marker).into());
        Ok(doc)
    })
}

fn doc_at_version(version: i64) -> DocumentValue {
    let mut doc = DocumentValue::empty_map();
    doc.set_entity_version(version);
    doc
}

// =============================================================================
// Eager chain validation
// =============================================================================

/// A hole in the chain fails at build time with the exact missing step.
#[test]
fn test_gap_fails_at_construction() {
    let result = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(2, append_marker("b"))
        .register(4, append_marker("d"))
        .build(5);

    assert_eq!(
        result.unwrap_err(),
        MigrationError::MissingMigrationStep { source: 3, target: 4 }
    );
}

/// A chain that stops short of the supported version is also a gap.
#[test]
fn test_short_chain_fails_at_construction() {
    let result = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .build(4);

    assert_eq!(
        result.unwrap_err(),
        MigrationError::MissingMigrationStep { source: 2, target: 3 }
    );
}

/// The store cannot open over an invalid chain; the gap prevents serving
/// traffic entirely.
#[test]
fn test_store_cannot_open_over_gap() {
    let migrations = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(3, append_marker("c"));
    let result = ObjectStore::open(
        ObjectStoreConfig::new(4, vec![]),
        migrations,
        Arc::new(MemoryBackend::new()),
    );

    assert!(matches!(
        result,
        Err(StoreError::Migration(MigrationError::MissingMigrationStep {
            source: 2,
            target: 3
        }))
    ));
}

/// An empty registry is valid; there is nothing historical to migrate.
#[test]
fn test_empty_chain_is_valid() {
    assert!(MigrationRegistry::builder().build(7).is_ok());
}

// =============================================================================
// Sequencing
// =============================================================================

/// Steps run in version order, each consuming the previous output.
#[test]
fn test_steps_compose_in_order() {
    let registry = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(2, append_marker("b"))
        .register(3, append_marker("c"))
        .build(4)
        .unwrap();

    let migrated = registry.migrate(doc_at_version(1), 1, 4).unwrap();
    assert_eq!(migrated.get("trail").and_then(|v| v.as_str()), Some("abc"));
    assert_eq!(migrated.entity_version(), Some(4));
}

/// A partial climb starts mid-chain.
#[test]
fn test_migration_from_intermediate_version() {
    let registry = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(2, append_marker("b"))
        .register(3, append_marker("c"))
        .build(4)
        .unwrap();

    let migrated = registry.migrate(doc_at_version(3), 3, 4).unwrap();
    assert_eq!(migrated.get("trail").and_then(|v| v.as_str()), Some("c"));
}

/// Migrating output that is already at the target changes nothing.
#[test]
fn test_migration_idempotent_at_target() {
    let registry = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(2, append_marker("b"))
        .build(3)
        .unwrap();

    let once = registry.migrate(doc_at_version(1), 1, 3).unwrap();
    let twice = registry.migrate(once.clone(), 3, 3).unwrap();
    assert_eq!(once, twice, "second pass over migrated output must be a no-op");
}

/// A failing transform surfaces with its step context and aborts the chain.
#[test]
fn test_step_failure_aborts_chain() {
    let registry = MigrationRegistry::builder()
        .register(1, append_marker("a"))
        .register(2, Box::new(|_| Err("unmapped enum value".into())))
        .build(3)
        .unwrap();

    let err = registry.migrate(doc_at_version(1), 1, 3).unwrap_err();
    assert_eq!(
        err,
        MigrationError::StepFailed {
            source: 2,
            target: 3,
            reason: "unmapped enum value".into()
        }
    );
}
