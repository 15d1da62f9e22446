//! Generic document values for driftstore
//!
//! Every stored object passes through this module's `DocumentValue` on its
//! way to or from the binary document column. The codec, the migration
//! pipeline, and the column projector all operate on this untyped tree so
//! that none of them need to know the strongly-typed shape of the object.
//!
//! # Design Principles
//!
//! - Pure value semantics (no shared mutable state between calls)
//! - Maps preserve insertion order (re-encoding must be byte-stable)
//! - The root of a storable document is a map carrying an integer
//!   `entityVersion` field

mod path;
mod value;

pub use path::split_path;
pub use value::{DocumentValue, ENTITY_VERSION_FIELD};
