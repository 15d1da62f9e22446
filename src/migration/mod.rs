//! Schema migration pipeline for driftstore
//!
//! A migration step rewrites a document from one schema generation to the
//! next (`v` to `v + 1`). The registry holds the full chain and composes
//! the steps into a single forward migration on read.
//!
//! # Design Principles
//!
//! - Steps are pure transforms over `DocumentValue`; no I/O, no shared state
//! - The chain is validated eagerly at construction: a gap is a startup
//!   failure, never a runtime surprise
//! - The registry guarantees sequencing only, not per-step semantic
//!   correctness
//! - The registry re-stamps `entityVersion` after each step, so the version
//!   invariant holds independent of transform discipline

mod errors;
mod registry;
mod step;

pub use errors::{MigrationError, MigrationResult};
pub use registry::{MigrationRegistry, MigrationRegistryBuilder};
pub use step::{MigrationFn, MigrationStep};
