//! Binary document codec for driftstore
//!
//! Serializes a `DocumentValue` to and from the storage engine's binary
//! document column. The blob carries the entity version in a fixed header
//! so that readers can decide whether migration is needed without paying
//! the cost of a full tree decode.
//!
//! # Design Principles
//!
//! - Deterministic encoding (re-encoding a decoded, unmigrated document is
//!   byte-stable)
//! - Checksum-verified on every read, including version peeks
//! - Corruption is never ignored; a malformed blob fails the read

mod blob;
mod checksum;
mod errors;

pub use blob::{decode, encode, peek_version, FORMAT_TAG};
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{CodecError, CodecResult};
