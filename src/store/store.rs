//! The `ObjectStore` facade

use super::backend::{QueryFilter, RowBackend};
use super::errors::{StoreError, StoreResult};
use super::instance::ObjectInstance;
use super::row::StoredRow;
use crate::codec;
use crate::document::DocumentValue;
use crate::gate::VersionGate;
use crate::migration::MigrationRegistryBuilder;
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::projection::{ColumnSpec, IndexedColumnProjector};
use std::sync::Arc;
use uuid::Uuid;

/// Immutable store configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    /// The schema generation this software fully operates on
    pub supported_version: i64,
    /// Declared indexed columns mirrored from every document
    pub columns: Vec<ColumnSpec>,
}

impl ObjectStoreConfig {
    pub fn new(supported_version: i64, columns: Vec<ColumnSpec>) -> Self {
        Self {
            supported_version,
            columns,
        }
    }
}

/// State shared between the facade and the instances it hands out.
pub(crate) struct StoreShared {
    pub(crate) gate: VersionGate,
    pub(crate) projector: IndexedColumnProjector,
    pub(crate) metrics: MetricsRegistry,
}

impl StoreShared {
    /// Decode a blob and run it through the version gate.
    ///
    /// This is the single choke point for full decodes; the decode counter
    /// moves here and nowhere else.
    pub(crate) fn materialize(&self, blob: &[u8]) -> StoreResult<DocumentValue> {
        let document = match codec::decode(blob) {
            Ok(document) => document,
            Err(err) => {
                self.metrics.increment_malformed_rejected();
                log_event(
                    Event::MalformedBlobRejected,
                    &[("reason", &err.to_string())],
                );
                return Err(err.into());
            }
        };
        self.metrics.increment_blob_decodes();

        let found = document.entity_version();
        let admitted = self.gate.admit(document).map_err(|err| {
            let err: StoreError = err.into();
            match &err {
                StoreError::IncompatibleVersion { found, max } => {
                    self.metrics.increment_incompatible_rejected();
                    log_event(
                        Event::IncompatibleVersionRejected,
                        &[
                            ("found", &found.to_string()),
                            ("max", &max.to_string()),
                        ],
                    );
                }
                StoreError::MalformedDocument(_) => {
                    self.metrics.increment_malformed_rejected();
                    log_event(Event::MalformedBlobRejected, &[("reason", &err.to_string())]);
                }
                _ => {}
            }
            err
        })?;

        if let Some(found) = found {
            let supported = self.gate.supported_version();
            if found < supported {
                self.metrics.increment_migrations_run();
                self.metrics.add_migration_steps((supported - found) as u64);
                log_event(
                    Event::DocumentMigrated,
                    &[
                        ("from", &found.to_string()),
                        ("to", &supported.to_string()),
                    ],
                );
            }
        }
        Ok(admitted)
    }
}

/// The schema-evolution store facade.
///
/// Two read modes and one write mode:
/// - `read_by_id` returns a fully Materialized instance,
/// - `read_by_query` streams cheap Projected instances,
/// - `write` persists one atomic (blob, indexed-columns) pair stamped at
///   `supported_version`.
pub struct ObjectStore {
    backend: Arc<dyn RowBackend>,
    shared: Arc<StoreShared>,
}

impl ObjectStore {
    /// Construct the store, validating the migration chain.
    ///
    /// A gap in the chain up to `supported_version` fails here, before any
    /// traffic is served.
    pub fn open(
        config: ObjectStoreConfig,
        migrations: MigrationRegistryBuilder,
        backend: Arc<dyn RowBackend>,
    ) -> StoreResult<Self> {
        let registry = migrations.build(config.supported_version)?;
        log_event(
            Event::RegistryValidated,
            &[("supported_version", &config.supported_version.to_string())],
        );

        let gate = VersionGate::new(config.supported_version, Arc::new(registry));
        let projector = IndexedColumnProjector::new(config.columns);
        let store = Self {
            backend,
            shared: Arc::new(StoreShared {
                gate,
                projector,
                metrics: MetricsRegistry::new(),
            }),
        };
        log_event(
            Event::StoreOpen,
            &[("supported_version", &config.supported_version.to_string())],
        );
        Ok(store)
    }

    /// The schema generation this store operates on
    pub fn supported_version(&self) -> i64 {
        self.shared.gate.supported_version()
    }

    /// The pipeline counters (tests assert laziness against these)
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.shared.metrics
    }

    /// Declared indexed columns
    pub fn columns(&self) -> &[ColumnSpec] {
        self.shared.projector.columns()
    }

    /// Load one object fully: decode, migrate, materialize.
    ///
    /// Reads never write back: a migrated document lives in memory only,
    /// and the stored bytes keep their original version until the next
    /// `write`.
    pub fn read_by_id(&self, id: &str) -> StoreResult<ObjectInstance> {
        let row = self
            .backend
            .get(id)?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        let document = self.shared.materialize(&row.blob)?;
        self.shared.metrics.increment_reads_by_id();
        Ok(ObjectInstance::materialized(
            row,
            document,
            Arc::clone(&self.shared),
        ))
    }

    /// Stream Projected instances matching a filter over indexed columns.
    ///
    /// No blob is decoded until a consumer promotes an instance; stopping
    /// early costs nothing beyond the rows already fetched.
    pub fn read_by_query(&self, filter: &QueryFilter) -> StoreResult<QueryResults> {
        log_event(Event::QueryStart, &[]);
        let rows = self.backend.scan(filter)?;
        Ok(QueryResults {
            rows,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Persist an instance as one atomic (blob, indexed-columns) pair.
    ///
    /// A Projected instance is promoted first, so a write never proceeds
    /// against a partial view. The document is stamped
    /// `entityVersion = supported_version` unconditionally and the indexed
    /// columns are recomputed from the new blob.
    pub fn write(&self, instance: &mut ObjectInstance) -> StoreResult<()> {
        let supported = self.supported_version();
        let id = instance.id().to_string();

        let document = instance.materialized_document()?;
        document.set_entity_version(supported);

        let columns = self.shared.projector.project(document);
        let blob = codec::encode(document)?;
        self.shared.metrics.increment_blob_encodes();

        let row = StoredRow::new(id, blob, columns);
        self.backend.put(row.clone())?;
        instance.replace_row(row);

        self.shared.metrics.increment_writes();
        log_event(
            Event::RowWritten,
            &[
                ("row_id", instance.id()),
                ("entity_version", &supported.to_string()),
            ],
        );
        Ok(())
    }

    /// Create a new object under the given id. Creation is a write: the
    /// document is stamped with `supported_version` at first persist.
    pub fn create(&self, id: &str, document: DocumentValue) -> StoreResult<ObjectInstance> {
        let row = StoredRow::new(id, Vec::new(), Default::default());
        let mut instance =
            ObjectInstance::materialized(row, document, Arc::clone(&self.shared));
        self.write(&mut instance)?;
        Ok(instance)
    }

    /// Create a new object under a generated UUID v4 row id.
    pub fn create_with_generated_id(
        &self,
        document: DocumentValue,
    ) -> StoreResult<ObjectInstance> {
        let id = Uuid::new_v4().to_string();
        self.create(&id, document)
    }
}

/// Lazy sequence of Projected instances produced by `read_by_query`.
///
/// Each pull yields one instance built from indexed columns alone; the
/// consumer may stop at any point with no cleanup obligations.
pub struct QueryResults {
    rows: Box<dyn Iterator<Item = StoredRow> + Send>,
    shared: Arc<StoreShared>,
}

impl Iterator for QueryResults {
    type Item = ObjectInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.shared.metrics.increment_query_rows_projected();
        Some(ObjectInstance::projected(row, Arc::clone(&self.shared)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::{MigrationFn, MigrationRegistry};
    use crate::projection::ScalarValue;
    use crate::store::backend::MemoryBackend;
    use crate::store::instance::ProjectionState;

    fn rename_field(from: &'static str, to: &'static str) -> MigrationFn {
        Box::new(move |mut doc: DocumentValue| {
            if let Some(value) = doc.remove(from) {
                doc.set(to, value);
            }
            Ok(doc)
        })
    }

    fn test_store() -> ObjectStore {
        let config = ObjectStoreConfig::new(
            3,
            vec![
                ColumnSpec::field("name"),
                ColumnSpec::new("city", "address.city"),
            ],
        );
        let migrations = MigrationRegistry::builder()
            .register(1, rename_field("fullname", "name"))
            .register(2, Box::new(Ok));
        ObjectStore::open(config, migrations, Arc::new(MemoryBackend::new())).unwrap()
    }

    fn sample_document() -> DocumentValue {
        let mut doc = DocumentValue::empty_map();
        doc.set("name", "Alice".into());
        doc.set("address.city", "Lagos".into());
        doc.set("email", "alice@example.com".into());
        doc
    }

    #[test]
    fn test_open_rejects_migration_gap() {
        let config = ObjectStoreConfig::new(3, vec![]);
        let migrations = MigrationRegistry::builder().register(1, Box::new(Ok));
        let result = ObjectStore::open(config, migrations, Arc::new(MemoryBackend::new()));
        assert!(matches!(
            result,
            Err(StoreError::Migration(
                crate::migration::MigrationError::MissingMigrationStep { source: 2, target: 3 }
            ))
        ));
    }

    #[test]
    fn test_create_stamps_supported_version() {
        let store = test_store();
        let instance = store.create("obj-1", sample_document()).unwrap();

        assert_eq!(
            instance.document().and_then(|d| d.entity_version()),
            Some(3)
        );
        // Stored bytes carry the stamp too
        let reread = store.read_by_id("obj-1").unwrap();
        assert_eq!(reread.document().and_then(|d| d.entity_version()), Some(3));
    }

    #[test]
    fn test_write_recomputes_indexed_columns() {
        let store = test_store();
        let mut instance = store.create("obj-1", sample_document()).unwrap();
        assert_eq!(
            instance.row().column("city").and_then(|v| v.as_str()),
            Some("Lagos")
        );

        instance.set_field("address.city", "Accra".into()).unwrap();
        store.write(&mut instance).unwrap();

        let reread = store.read_by_id("obj-1").unwrap();
        assert_eq!(
            reread.row().column("city").and_then(|v| v.as_str()),
            Some("Accra")
        );
    }

    #[test]
    fn test_read_by_id_is_materialized() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();
        let instance = store.read_by_id("obj-1").unwrap();
        assert_eq!(instance.state(), ProjectionState::Materialized);
    }

    #[test]
    fn test_read_by_id_not_found() {
        let store = test_store();
        let err = store.read_by_id("missing").unwrap_err();
        assert_eq!(err, StoreError::NotFound { id: "missing".into() });
    }

    #[test]
    fn test_query_yields_projected_instances() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();

        let mut results = store.read_by_query(&QueryFilter::equals("name", "Alice")).unwrap();
        let instance = results.next().unwrap();
        assert_eq!(instance.state(), ProjectionState::Projected);
        assert_eq!(
            instance.indexed_column("city").and_then(|v| v.as_str()),
            Some("Lagos")
        );
        assert!(results.next().is_none());
    }

    #[test]
    fn test_indexed_read_costs_zero_decodes() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();
        let decodes_before = store.metrics().blob_decodes();

        let mut results = store.read_by_query(&QueryFilter::all()).unwrap();
        let instance = results.next().unwrap();
        let _ = instance.indexed_column("name");
        let _ = instance.indexed_column("city");

        assert_eq!(store.metrics().blob_decodes(), decodes_before);
    }

    #[test]
    fn test_deep_read_costs_exactly_one_decode() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();
        let decodes_before = store.metrics().blob_decodes();

        let mut results = store.read_by_query(&QueryFilter::all()).unwrap();
        let mut instance = results.next().unwrap();

        let email = instance.field("email").unwrap().cloned();
        assert_eq!(email.and_then(|v| v.as_str().map(String::from)),
            Some("alice@example.com".into()));
        assert_eq!(instance.state(), ProjectionState::Materialized);
        assert_eq!(store.metrics().blob_decodes(), decodes_before + 1);

        // Further deep reads reuse the materialized document
        let _ = instance.field("name").unwrap();
        assert_eq!(store.metrics().blob_decodes(), decodes_before + 1);
    }

    #[test]
    fn test_promote_is_idempotent() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();

        let mut instance = store
            .read_by_query(&QueryFilter::all())
            .unwrap()
            .next()
            .unwrap();
        instance.promote().unwrap();
        let promotions = store.metrics().snapshot().promotions;
        instance.promote().unwrap();
        assert_eq!(store.metrics().snapshot().promotions, promotions);
    }

    #[test]
    fn test_promoted_instance_matches_read_by_id() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();

        let mut projected = store
            .read_by_query(&QueryFilter::all())
            .unwrap()
            .next()
            .unwrap();
        projected.promote().unwrap();

        let by_id = store.read_by_id("obj-1").unwrap();
        assert_eq!(projected.document(), by_id.document());
    }

    #[test]
    fn test_write_on_projected_promotes_first() {
        let store = test_store();
        store.create("obj-1", sample_document()).unwrap();

        let mut instance = store
            .read_by_query(&QueryFilter::all())
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(instance.state(), ProjectionState::Projected);
        store.write(&mut instance).unwrap();
        assert_eq!(instance.state(), ProjectionState::Materialized);

        // Nothing was lost by writing through the projected view
        let reread = store.read_by_id("obj-1").unwrap();
        assert_eq!(
            reread.document().and_then(|d| d.get("email")).and_then(|v| v.as_str()),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let store = test_store();
        let a = store.create_with_generated_id(sample_document()).unwrap();
        let b = store.create_with_generated_id(sample_document()).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
