//! The lazy projection/materialization state machine
//!
//! States are explicit and enumerable, transitions are event-driven, and
//! Materialized is terminal:
//!
//! ```text
//! Projected --promote()--> Materialized
//! ```
//!
//! A Projected instance exposes only its indexed columns; the blob rides
//! along unread. Any deep-field read or any field write promotes first, so
//! a caller never observes a stale value and never writes against a
//! partial view. Reading an indexed column works in either state without
//! promotion.

use super::errors::{StoreError, StoreResult};
use super::row::StoredRow;
use super::store::StoreShared;
use crate::document::DocumentValue;
use crate::observability::{log_event, Event};
use crate::projection::ScalarValue;
use std::sync::Arc;

/// Per-instance lifecycle flag. Once Materialized, an instance never
/// reverts to Projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionState {
    /// Only indexed-column fields populated; blob unread
    Projected,
    /// Full document decoded; all fields available (terminal)
    Materialized,
}

/// An in-memory view of one stored row.
///
/// Wraps exactly one row and one projection state; the only mutable
/// in-process entity in the pipeline. Created fresh per load call and
/// discarded with the caller; the state never persists.
pub struct ObjectInstance {
    row: StoredRow,
    state: ProjectionState,
    document: Option<DocumentValue>,
    shared: Arc<StoreShared>,
}

impl ObjectInstance {
    /// Open in Projected state directly from indexed columns. No blob
    /// decode is performed.
    pub(crate) fn projected(row: StoredRow, shared: Arc<StoreShared>) -> Self {
        Self {
            row,
            state: ProjectionState::Projected,
            document: None,
            shared,
        }
    }

    /// Open directly in Materialized state from an already-admitted
    /// document.
    pub(crate) fn materialized(
        row: StoredRow,
        document: DocumentValue,
        shared: Arc<StoreShared>,
    ) -> Self {
        Self {
            row,
            state: ProjectionState::Materialized,
            document: Some(document),
            shared,
        }
    }

    /// Row primary key
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    pub fn is_materialized(&self) -> bool {
        self.state == ProjectionState::Materialized
    }

    /// Read an indexed column. Works in either state, never promotes: this
    /// is the cheap path queries exist for.
    pub fn indexed_column(&self, name: &str) -> Option<&ScalarValue> {
        self.row.column(name)
    }

    /// Materialize this instance in place.
    ///
    /// Decodes the blob and runs it through the version gate. Idempotent:
    /// promoting an already-Materialized instance is a no-op.
    pub fn promote(&mut self) -> StoreResult<()> {
        if self.state == ProjectionState::Materialized {
            return Ok(());
        }
        let document = self.shared.materialize(&self.row.blob)?;
        self.document = Some(document);
        self.state = ProjectionState::Materialized;
        self.shared.metrics.increment_promotions();
        log_event(Event::InstancePromoted, &[("row_id", &self.row.id)]);
        Ok(())
    }

    /// Read a deep field, promoting first if necessary.
    pub fn field(&mut self, path: &str) -> StoreResult<Option<&DocumentValue>> {
        self.promote()?;
        Ok(self.document.as_ref().and_then(|doc| doc.get(path)))
    }

    /// Write a field, promoting first if necessary. Writes never proceed
    /// against a partial view.
    pub fn set_field(&mut self, path: &str, value: DocumentValue) -> StoreResult<()> {
        self.materialized_document()?.set(path, value);
        Ok(())
    }

    /// The decoded document, if this instance has materialized
    pub fn document(&self) -> Option<&DocumentValue> {
        self.document.as_ref()
    }

    /// The row as last loaded or persisted
    pub fn row(&self) -> &StoredRow {
        &self.row
    }

    pub(crate) fn materialized_document(&mut self) -> StoreResult<&mut DocumentValue> {
        self.promote()?;
        // promote() always leaves a document behind on success
        self.document.as_mut().ok_or_else(|| {
            StoreError::Backend(super::backend::BackendError::Unavailable(
                "materialized instance has no document".into(),
            ))
        })
    }

    pub(crate) fn replace_row(&mut self, row: StoredRow) {
        self.row = row;
    }
}

impl std::fmt::Debug for ObjectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectInstance")
            .field("id", &self.row.id)
            .field("state", &self.state)
            .finish()
    }
}
