//! Observable events in the store lifecycle
//!
//! Events are explicit and typed; one log line per event.

use std::fmt;

/// Observable events emitted by the store pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Store constructed; registry validated, ready to serve
    StoreOpen,
    /// Migration chain validated at construction
    RegistryValidated,

    // Read path
    /// A blob was fully decoded
    BlobDecoded,
    /// A document was migrated upward in memory
    DocumentMigrated,
    /// A projected instance was materialized
    InstancePromoted,
    /// A query began streaming projected instances
    QueryStart,

    // Write path
    /// One atomic (blob, indexed-columns) row was persisted
    RowWritten,

    // Rejections
    /// Document version beyond the forward-compatibility window
    IncompatibleVersionRejected,
    /// Blob could not be read as a versioned document
    MalformedBlobRejected,
}

impl Event {
    /// Returns the event code emitted in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpen => "DRIFT_STORE_OPEN",
            Event::RegistryValidated => "DRIFT_REGISTRY_VALIDATED",
            Event::BlobDecoded => "DRIFT_BLOB_DECODED",
            Event::DocumentMigrated => "DRIFT_DOCUMENT_MIGRATED",
            Event::InstancePromoted => "DRIFT_INSTANCE_PROMOTED",
            Event::QueryStart => "DRIFT_QUERY_START",
            Event::RowWritten => "DRIFT_ROW_WRITTEN",
            Event::IncompatibleVersionRejected => "DRIFT_INCOMPATIBLE_VERSION_REJECTED",
            Event::MalformedBlobRejected => "DRIFT_MALFORMED_BLOB_REJECTED",
        }
    }

    /// Whether this event records a rejected read
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Event::IncompatibleVersionRejected | Event::MalformedBlobRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
