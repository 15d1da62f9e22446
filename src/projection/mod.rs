//! Indexed column projection for driftstore
//!
//! At write time a fixed set of declared paths is mirrored from the
//! document into flat scalar columns, so the storage engine can index and
//! filter without decoding the blob. The columns are never the source of
//! truth: they are recomputed from the blob on every write and never
//! patched independently.

mod projector;
mod scalar;

pub use projector::{ColumnSpec, IndexedColumnProjector};
pub use scalar::ScalarValue;
