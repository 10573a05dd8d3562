//! Composite row creation

use crate::error::RestoreResult;
use crate::restorer::ClozeRestorer;
use crate::store::RestoreStore;
use cloze_codec::RecordId;
use serde::{Deserialize, Serialize};

/// Composite row as found in the backup, all ids old
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeData {
    /// Row id in the backup
    pub id: RecordId,
    /// Owning question id in the backup
    pub question: RecordId,
    /// Sequence as stored in the backup
    pub sequence: String,
}

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Recreate a composite row if restore created its question
    ///
    /// The sequence is stored as found: children may not exist yet, so it
    /// is recoded later by [`ClozeRestorer::after_restore`]. Questions that
    /// were matched to existing ones already have their row and are left
    /// alone.
    ///
    /// Returns the new row id, or `None` when nothing was inserted.
    ///
    /// # Errors
    /// Storage failure, or mapping write after the table was frozen
    pub fn process_composite(&mut self, data: &CompositeData) -> RestoreResult<Option<RecordId>> {
        let namespaces = &self.config.namespaces;
        let Some(new_question) = self.mapping.resolve(&namespaces.question_created, data.question) else {
            tracing::debug!(question = %data.question, "question not created by restore, composite kept");
            return Ok(None);
        };

        let row = self.store.insert_composite(new_question, &data.sequence)?;
        self.mapping.set_mapping(&namespaces.composite, data.id, row)?;
        tracing::debug!(
            old_row = %data.id,
            %row,
            question = %new_question,
            sequence = %data.sequence,
            "composite row created"
        );
        Ok(Some(row))
    }
}
