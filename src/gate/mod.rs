//! Version admission for driftstore
//!
//! The gate enforces the compatibility contract on every read:
//!
//! - a reader fully operates on documents at or below its own
//!   `supported_version`, migrating older ones upward in memory;
//! - a reader accepts documents written by software exactly one version
//!   ahead of itself, unmigrated (the forward-compatibility window);
//! - anything further ahead is rejected, and the caller must upgrade the
//!   software rather than retry.
//!
//! Admission is pure: it never writes back to storage, so re-reading the
//! same unmigrated bytes always re-derives the same migrated result.

mod errors;

pub use errors::{GateError, GateResult};

use crate::document::DocumentValue;
use crate::migration::MigrationRegistry;
use std::sync::Arc;

/// Enforces the version-compatibility contract on read.
#[derive(Debug, Clone)]
pub struct VersionGate {
    supported_version: i64,
    registry: Arc<MigrationRegistry>,
}

impl VersionGate {
    /// Create a gate for a process that fully operates on
    /// `supported_version`. The registry must have been built against the
    /// same version.
    pub fn new(supported_version: i64, registry: Arc<MigrationRegistry>) -> Self {
        Self {
            supported_version,
            registry,
        }
    }

    pub fn supported_version(&self) -> i64 {
        self.supported_version
    }

    /// Admit a decoded document, migrating it upward if necessary.
    ///
    /// The returned document has effective version `supported_version`,
    /// except inside the forward-compatibility window where it keeps
    /// `supported_version + 1`.
    pub fn admit(&self, doc: DocumentValue) -> GateResult<DocumentValue> {
        let Some(found) = doc.entity_version() else {
            return Err(GateError::MissingVersion);
        };

        if found > self.supported_version + 1 {
            return Err(GateError::IncompatibleVersion {
                found,
                max: self.supported_version,
            });
        }
        if found >= self.supported_version {
            // Current version, or one ahead: accepted as-is, no migration.
            return Ok(doc);
        }
        Ok(self
            .registry
            .migrate(doc, found, self.supported_version)?)
    }
}
