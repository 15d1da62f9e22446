//! Single version-to-version migration steps

use super::errors::{MigrationError, MigrationResult};
use crate::document::DocumentValue;

/// A pure document transform. Must be total and side-effect-free; the
/// registry owns sequencing and version stamping.
pub type MigrationFn =
    Box<dyn Fn(DocumentValue) -> Result<DocumentValue, String> + Send + Sync>;

/// One forward migration step from `source_version` to `source_version + 1`.
pub struct MigrationStep {
    source_version: i64,
    transform: MigrationFn,
}

impl MigrationStep {
    pub fn new(source_version: i64, transform: MigrationFn) -> Self {
        Self {
            source_version,
            transform,
        }
    }

    /// The schema generation this step consumes
    pub fn source_version(&self) -> i64 {
        self.source_version
    }

    /// The schema generation this step produces
    pub fn target_version(&self) -> i64 {
        self.source_version + 1
    }

    /// Run the transform and stamp the output with the target version.
    pub fn apply(&self, doc: DocumentValue) -> MigrationResult<DocumentValue> {
        let mut migrated =
            (self.transform)(doc).map_err(|reason| MigrationError::StepFailed {
                source: self.source_version,
                target: self.target_version(),
                reason,
            })?;
        migrated.set_entity_version(self.target_version());
        Ok(migrated)
    }
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("source_version", &self.source_version)
            .field("target_version", &self.target_version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stamps_target_version() {
        let step = MigrationStep::new(1, Box::new(Ok));
        let mut doc = DocumentValue::empty_map();
        doc.set_entity_version(1);

        let migrated = step.apply(doc).unwrap();
        assert_eq!(migrated.entity_version(), Some(2));
    }

    #[test]
    fn test_step_stamps_even_when_transform_forgets() {
        // A transform that rebuilds the document and drops the version field
        let step = MigrationStep::new(4, Box::new(|_| Ok(DocumentValue::empty_map())));
        let mut doc = DocumentValue::empty_map();
        doc.set_entity_version(4);

        let migrated = step.apply(doc).unwrap();
        assert_eq!(migrated.entity_version(), Some(5));
    }

    #[test]
    fn test_step_failure_carries_context() {
        let step = MigrationStep::new(2, Box::new(|_| Err("bad field".into())));
        let mut doc = DocumentValue::empty_map();
        doc.set_entity_version(2);

        let err = step.apply(doc).unwrap_err();
        assert_eq!(
            err,
            MigrationError::StepFailed {
                source: 2,
                target: 3,
                reason: "bad field".into()
            }
        );
    }
}
