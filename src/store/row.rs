//! The persisted row shape

use crate::projection::ScalarValue;
use std::collections::BTreeMap;

/// One persisted object: the binary document column plus its mirrored
/// indexed columns.
///
/// A row is created on first write and mutated only by subsequent writes,
/// never by reads. The indexed columns are always a pure function of the
/// blob; the store recomputes them on every write and the storage engine
/// never accepts external writes to them.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    /// Row primary key
    pub id: String,
    /// Serialized document (the binary document column)
    pub blob: Vec<u8>,
    /// Read-only scalar columns mirrored from the blob
    pub columns: BTreeMap<String, ScalarValue>,
}

impl StoredRow {
    pub fn new(
        id: impl Into<String>,
        blob: Vec<u8>,
        columns: BTreeMap<String, ScalarValue>,
    ) -> Self {
        Self {
            id: id.into(),
            blob,
            columns,
        }
    }

    /// Look up an indexed column by name
    pub fn column(&self, name: &str) -> Option<&ScalarValue> {
        self.columns.get(name)
    }
}
