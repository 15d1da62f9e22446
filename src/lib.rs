//! driftstore - a zero-downtime schema-evolution layer
//!
//! Objects persist as self-describing versioned documents in a single binary
//! document column, with selected fields mirrored into read-only indexed
//! scalar columns. Old and new software read each other's data without
//! synchronized schema upgrades: documents are migrated upward in memory on
//! read, and a reader accepts data written by software at most one version
//! ahead of itself.

pub mod codec;
pub mod document;
pub mod gate;
pub mod migration;
pub mod observability;
pub mod projection;
pub mod store;
