//! Restore bundles
//!
//! A bundle is a JSON document carrying everything one restore run needs:
//! the target store, the mappings recorded while records were created, the
//! composite rows from the backup and the attempt data to recode.

use crate::batch::{AttemptItem, BatchReport};
use crate::composite::CompositeData;
use crate::config::RestoreConfig;
use crate::corrector::CorrectionReport;
use crate::error::{BundleError, RestoreResult};
use crate::restorer::ClozeRestorer;
use crate::store::MemoryStore;
use cloze_codec::RecordId;
use cloze_mapping::{MappingEntry, MappingTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Input of a full restore run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreBundle {
    /// Store restored into
    #[serde(default)]
    pub store: MemoryStore,
    /// Mappings recorded during record creation
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
    /// Composite rows from the backup
    #[serde(default)]
    pub composites: Vec<CompositeData>,
    /// Attempt data to recode after correction
    #[serde(default)]
    pub attempts: Vec<AttemptItem>,
}

/// Output of [`RestoreBundle::run`]
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// New composite row ids, `None` for questions that were not created
    pub created: Vec<Option<RecordId>>,
    /// Post-restore correction
    pub correction: CorrectionReport,
    /// Attempt recoding
    pub attempts: BatchReport,
    /// Store after the run
    pub store: MemoryStore,
}

impl RestoreBundle {
    /// Parse JSON text
    ///
    /// # Errors
    /// Returns [`BundleError::Parse`] on invalid JSON
    pub fn from_json_str(text: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a JSON file
    ///
    /// # Errors
    /// Returns [`BundleError`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Run creation, correction and attempt recoding in order
    ///
    /// # Errors
    /// Any batch-fatal [`crate::RestoreError`]
    pub fn run(self, config: RestoreConfig) -> RestoreResult<RunReport> {
        let mapping = Arc::new(MappingTable::new());
        for entry in &self.mappings {
            mapping.insert_entry(entry)?;
        }

        let mut restorer = ClozeRestorer::new(self.store, mapping).with_config(config);
        let created = self
            .composites
            .iter()
            .map(|data| restorer.process_composite(data))
            .collect::<RestoreResult<Vec<_>>>()?;
        let correction = restorer.after_restore()?;
        let attempts = restorer.recode_attempts(&self.attempts)?;

        Ok(RunReport {
            created,
            correction,
            attempts,
            store: restorer.into_store(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestoreError;

    #[test]
    fn empty_bundle_runs() {
        let report = RestoreBundle::from_json_str("{}")
            .unwrap()
            .run(RestoreConfig::default())
            .unwrap();

        assert!(report.created.is_empty());
        assert_eq!(report.correction.composites, 0);
        assert!(report.attempts.outcomes.is_empty());
    }

    #[test]
    fn conflicting_mappings_abort() {
        let json = r#"{"mappings": [
            {"namespace": "question", "old_id": 5, "new_id": 105},
            {"namespace": "question", "old_id": 5, "new_id": 106}
        ]}"#;
        let err = RestoreBundle::from_json_str(json)
            .unwrap()
            .run(RestoreConfig::default())
            .unwrap_err();
        assert!(matches!(err, RestoreError::Mapping(_)));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            RestoreBundle::from_json_str("{").unwrap_err(),
            BundleError::Parse(_)
        ));
    }
}
