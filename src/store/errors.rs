//! Store error types
//!
//! The facade surfaces three fatal read conditions: a malformed blob, a
//! document beyond the forward-compatibility window, and a failed
//! migration step. None are retried; an incompatible version means the
//! software must be upgraded, not the data.

use super::backend::BackendError;
use crate::codec::CodecError;
use crate::gate::GateError;
use crate::migration::MigrationError;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the object store facade
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The blob cannot be read as a versioned document
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] CodecError),

    /// Document written more than one version ahead of this software
    #[error("incompatible document version: found {found}, supported at most {max} + 1")]
    IncompatibleVersion { found: i64, max: i64 },

    /// Upward migration failed
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// Storage engine failure
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// No row with the given id
    #[error("row '{id}' not found")]
    NotFound { id: String },
}

impl From<GateError> for StoreError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::IncompatibleVersion { found, max } => {
                StoreError::IncompatibleVersion { found, max }
            }
            // The gate saw a decoded document without a usable version tag
            GateError::MissingVersion => {
                StoreError::MalformedDocument(CodecError::MissingEntityVersion)
            }
            GateError::Migration(inner) => StoreError::Migration(inner),
        }
    }
}

impl StoreError {
    /// Whether this error means the running software is too old for the data
    pub fn is_incompatible(&self) -> bool {
        matches!(self, StoreError::IncompatibleVersion { .. })
    }

    /// Whether this error means the stored bytes are unusable
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::MalformedDocument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_mapping() {
        let err: StoreError = GateError::IncompatibleVersion { found: 5, max: 3 }.into();
        assert_eq!(err, StoreError::IncompatibleVersion { found: 5, max: 3 });
        assert!(err.is_incompatible());

        let err: StoreError = GateError::MissingVersion.into();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_codec_error_is_malformed() {
        let err: StoreError = CodecError::InvalidTag(99).into();
        assert!(err.is_malformed());
        assert!(!err.is_incompatible());
    }
}
