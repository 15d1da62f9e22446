//! The indexed column projector

use super::scalar::ScalarValue;
use crate::document::DocumentValue;
use std::collections::BTreeMap;

/// Declares one indexed column: a name the storage engine exposes and the
/// document path it mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub path: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// A column whose name is the path itself (the common case for
    /// top-level fields).
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
        }
    }
}

/// Computes the read-only scalar columns mirrored from a document.
///
/// Projection is total: it never fails for any document the gate admits.
/// A missing path or a composite value at the path yields a null scalar.
#[derive(Debug, Clone)]
pub struct IndexedColumnProjector {
    columns: Vec<ColumnSpec>,
}

impl IndexedColumnProjector {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The declared column specs, in declaration order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Whether `name` is a declared indexed column
    pub fn is_indexed(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Extract every declared column from the document.
    pub fn project(&self, doc: &DocumentValue) -> BTreeMap<String, ScalarValue> {
        self.columns
            .iter()
            .map(|column| {
                let value = ScalarValue::from_document(doc.get(&column.path));
                (column.name.clone(), value)
            })
            .collect()
    }
}
