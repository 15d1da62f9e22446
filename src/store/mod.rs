//! The object store facade
//!
//! Ties the codec, migration pipeline, version gate, and column projector
//! into the read/write contract:
//!
//! - `read_by_id` always fully loads and migrates (a strong signal that
//!   most fields or a write will follow)
//! - `read_by_query` streams cheap projected instances, deferring blob
//!   decode until a caller actually needs a deep field
//! - `write` persists one atomic (blob, indexed-columns) pair, stamped at
//!   the store's supported version
//!
//! Durability, isolation, and row-level conflict resolution belong to the
//! underlying storage engine behind the `RowBackend` seam.

mod backend;
mod errors;
mod instance;
mod row;
#[allow(clippy::module_inception)]
mod store;

pub use backend::{BackendError, BackendResult, ColumnPredicate, MemoryBackend, QueryFilter, RowBackend};
pub use errors::{StoreError, StoreResult};
pub use instance::{ObjectInstance, ProjectionState};
pub use row::StoredRow;
pub use store::{ObjectStore, ObjectStoreConfig, QueryResults};
