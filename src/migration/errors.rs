//! Migration error types

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Errors produced while building a registry or running a migration
// Display/Error are implemented by hand because thiserror treats any field
// named `source` as the error source, and these `source` fields are plain
// version numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// The chain has a hole; raised at registry construction, which must
    /// prevent the store from serving traffic
    MissingMigrationStep { source: i64, target: i64 },

    /// Two steps registered for the same source version
    DuplicateStep { source: i64 },

    /// A migration was requested downward; documents only migrate forward
    BackwardMigration { from: i64, to: i64 },

    /// A step's transform reported a failure
    StepFailed {
        source: i64,
        target: i64,
        reason: String,
    },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::MissingMigrationStep { source, target } => write!(
                f,
                "no migration step registered from version {source} to {target}"
            ),
            MigrationError::DuplicateStep { source } => {
                write!(f, "duplicate migration step for source version {source}")
            }
            MigrationError::BackwardMigration { from, to } => {
                write!(f, "cannot migrate backward from version {from} to {to}")
            }
            MigrationError::StepFailed {
                source,
                target,
                reason,
            } => write!(f, "migration step {source} -> {target} failed: {reason}"),
        }
    }
}

impl std::error::Error for MigrationError {}
