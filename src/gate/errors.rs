//! Gate error types

use crate::migration::MigrationError;
use thiserror::Error;

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;

/// Errors produced while admitting a document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    /// Document written by software more than one version ahead; the
    /// caller must upgrade, not retry
    #[error("document version {found} exceeds supported version {max} + 1")]
    IncompatibleVersion { found: i64, max: i64 },

    /// The document has no usable `entityVersion`; malformed, rejected
    /// before the compatibility rule is consulted
    #[error("document has no integer entityVersion field")]
    MissingVersion,

    /// Upward migration failed
    #[error(transparent)]
    Migration(#[from] MigrationError),
}
