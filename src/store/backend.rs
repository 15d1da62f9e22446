//! The storage engine seam
//!
//! The relational engine owns transactions, durability, and indexing; the
//! store only hands it one atomic (blob, indexed-columns) pair per write
//! and asks it to filter on indexed columns. `MemoryBackend` is the
//! reference implementation used by tests.

use super::row::StoredRow;
use crate::projection::ScalarValue;
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures reported by the storage engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// A lock guarding engine state was poisoned
    #[error("backend lock poisoned: {0}")]
    LockPoisoned(String),

    /// Engine-specific failure
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl<T> From<std::sync::PoisonError<T>> for BackendError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        BackendError::LockPoisoned(err.to_string())
    }
}

/// A predicate over one indexed column.
///
/// Null never orders: range predicates on a null column do not match.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnPredicate {
    Equals(ScalarValue),
    NotEquals(ScalarValue),
    GreaterThan(ScalarValue),
    LessThan(ScalarValue),
    IsNull,
    IsNotNull,
}

impl ColumnPredicate {
    /// Evaluate against a column value; an absent column behaves as null.
    pub fn matches(&self, value: Option<&ScalarValue>) -> bool {
        let null = ScalarValue::Null;
        let value = value.unwrap_or(&null);
        match self {
            ColumnPredicate::Equals(expected) => !value.is_null() && value == expected,
            ColumnPredicate::NotEquals(expected) => !value.is_null() && value != expected,
            ColumnPredicate::GreaterThan(bound) => matches!(
                value.partial_cmp_same_type(bound),
                Some(std::cmp::Ordering::Greater)
            ),
            ColumnPredicate::LessThan(bound) => matches!(
                value.partial_cmp_same_type(bound),
                Some(std::cmp::Ordering::Less)
            ),
            ColumnPredicate::IsNull => value.is_null(),
            ColumnPredicate::IsNotNull => !value.is_null(),
        }
    }
}

/// A conjunction of column predicates; an empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    predicates: Vec<(String, ColumnPredicate)>,
}

impl QueryFilter {
    /// A filter matching every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a predicate on an indexed column
    pub fn with(mut self, column: impl Into<String>, predicate: ColumnPredicate) -> Self {
        self.predicates.push((column.into(), predicate));
        self
    }

    /// Shorthand for an equality filter
    pub fn equals(column: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::all().with(column, ColumnPredicate::Equals(value.into()))
    }

    /// Column names this filter touches
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a row's indexed columns satisfy every predicate
    pub fn matches(&self, columns: &BTreeMap<String, ScalarValue>) -> bool {
        self.predicates
            .iter()
            .all(|(name, predicate)| predicate.matches(columns.get(name)))
    }
}

/// The storage engine contract.
///
/// One `put` call persists one atomic (blob, indexed-columns) pair; that is
/// the store's only promise to the engine, and the engine's only obligation
/// back is to keep the pair together.
pub trait RowBackend: Send + Sync {
    /// Fetch a row by primary key
    fn get(&self, id: &str) -> BackendResult<Option<StoredRow>>;

    /// Atomically upsert one row (blob and columns together)
    fn put(&self, row: StoredRow) -> BackendResult<()>;

    /// Stream rows whose indexed columns satisfy the filter.
    ///
    /// Only already-fetched rows are held by the iterator; a consumer may
    /// stop pulling at any point with no cleanup obligations.
    fn scan(
        &self,
        filter: &QueryFilter,
    ) -> BackendResult<Box<dyn Iterator<Item = StoredRow> + Send>>;
}

/// In-memory reference backend: a BTreeMap behind an RwLock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: RwLock<BTreeMap<String, StoredRow>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RowBackend for MemoryBackend {
    fn get(&self, id: &str) -> BackendResult<Option<StoredRow>> {
        let rows = self.rows.read()?;
        Ok(rows.get(id).cloned())
    }

    fn put(&self, row: StoredRow) -> BackendResult<()> {
        let mut rows = self.rows.write()?;
        rows.insert(row.id.clone(), row);
        Ok(())
    }

    fn scan(
        &self,
        filter: &QueryFilter,
    ) -> BackendResult<Box<dyn Iterator<Item = StoredRow> + Send>> {
        let rows = self.rows.read()?;
        // Match on indexed columns only; blobs travel along undecoded.
        let matching: Vec<StoredRow> = rows
            .values()
            .filter(|row| filter.matches(&row.columns))
            .cloned()
            .collect();
        Ok(Box::new(matching.into_iter()))
    }
}
