//! Post-restore correction
//!
//! Runs once all questions of a restore exist:
//!
//! 1. Every composite row owned by a created question gets its sequence
//!    recoded to the new child ids. Children that were not restored drop
//!    out of the sequence.
//! 2. Plain multichoice children of those composites have answer
//!    shuffling switched off. The gap positions are fixed by the parent's
//!    text, so a shuffled order would not match it.

use crate::error::{IntegrityWarning, RestoreError, RestoreResult};
use crate::restorer::ClozeRestorer;
use crate::store::{CompositeRow, RestoreStore};
use cloze_codec::{find_descriptor, RecordId, Sequence};
use serde::Serialize;

/// Outcome of [`ClozeRestorer::after_restore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionReport {
    /// Composite rows examined
    pub composites: usize,
    /// Rows whose stored sequence changed
    pub rewritten: usize,
    /// Sequence tokens dropped because no mapping exists
    pub unresolved: usize,
    /// Questions whose shuffle flag was switched off
    pub suppressed_shuffles: Vec<RecordId>,
    /// Integrity problems found
    pub warnings: Vec<IntegrityWarning>,
}

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Freeze the mapping table and correct every restored composite
    ///
    /// Runs once per restorer. Stored sequences hold new ids afterwards and
    /// must not go through the mapping again.
    ///
    /// # Errors
    /// [`RestoreError::AlreadyCorrected`] on a repeat call. Storage failure,
    /// which aborts the whole correction.
    pub fn after_restore(&mut self) -> RestoreResult<CorrectionReport> {
        if self.corrected {
            return Err(RestoreError::AlreadyCorrected);
        }
        self.mapping.freeze();
        self.corrected = true;

        let mut report = CorrectionReport::default();
        for question in self.mapping.new_ids(&self.config.namespaces.question_created) {
            let Some(row) = self.store.composite(question)? else {
                continue;
            };
            report.composites += 1;
            let children = self.recode_sequence(&row, &mut report)?;
            if !children.is_empty() {
                self.suppress_shuffles(&children, &mut report)?;
            }
        }

        self.log.info(
            None,
            format!(
                "corrected {} composite questions, {} sequences rewritten",
                report.composites, report.rewritten
            ),
        );
        Ok(report)
    }

    fn recode_sequence(
        &mut self,
        row: &CompositeRow,
        report: &mut CorrectionReport,
    ) -> RestoreResult<Vec<RecordId>> {
        let sequence = Sequence::parse(&row.sequence);
        if !sequence.is_consistent() {
            let warning = IntegrityWarning::SequenceTokenMismatch {
                question: row.question,
                raw: sequence.raw_token_count(),
                parsed: sequence.len(),
            };
            self.log.warn(Some(row.question), warning.to_string());
            report.warnings.push(warning);
        }

        let questions = &self.config.namespaces.question;
        let resolution = sequence.resolve(|token| self.mapping.resolve_token(questions, token));
        for token in &resolution.unresolved {
            tracing::debug!(question = %row.question, child = %token, "child not restored, dropped from sequence");
        }
        report.unresolved += resolution.unresolved.len();

        let recoded = resolution.sequence.serialize();
        self.store.set_composite_sequence(row.id, &recoded)?;
        if recoded != row.sequence {
            report.rewritten += 1;
        }
        tracing::debug!(question = %row.question, from = %row.sequence, to = %recoded, "sequence recoded");

        Ok(resolution.sequence.ids().to_vec())
    }

    fn suppress_shuffles(&mut self, children: &[RecordId], report: &mut CorrectionReport) -> RestoreResult<()> {
        for child in self.store.questions(children)? {
            if child.qtype != self.config.choice_type {
                continue;
            }
            let plain = find_descriptor(&child.text).is_some_and(|descriptor| descriptor.is_plain_multichoice());
            if !plain {
                continue;
            }
            let Some(options) = self.store.choice_options(child.id)? else {
                continue;
            };
            if options.shuffle_answers {
                self.store.set_shuffle_answers(options.id, false)?;
                tracing::debug!(question = %child.id, options = %options.id, "answer shuffling switched off");
                report.suppressed_shuffles.push(child.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ChoiceOptions, MemoryStore, QuestionRecord};
    use cloze_mapping::{MappingTable, Namespace};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn id(value: u64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    fn restorer(sequence: &str, mapped: &[(u64, u64)]) -> ClozeRestorer<MemoryStore> {
        let mapping = Arc::new(MappingTable::new());
        mapping
            .set_mapping(&Namespace::question_created(), id(12), id(112))
            .unwrap();
        for (old, new) in mapped {
            mapping.set_mapping(&Namespace::question(), id(*old), id(*new)).unwrap();
        }
        let mut store = MemoryStore::new();
        store.insert_composite(id(112), sequence).unwrap();
        ClozeRestorer::new(store, mapping)
    }

    fn stored_sequence(restorer: &ClozeRestorer<MemoryStore>) -> String {
        restorer.store().composite(id(112)).unwrap().unwrap().sequence
    }

    #[test]
    fn unmapped_child_dropped() {
        let mut restorer = restorer("5,7,9", &[(5, 105), (9, 109)]);
        let report = restorer.after_restore().unwrap();

        assert_eq!(stored_sequence(&restorer), "105,109");
        assert_eq!(report.composites, 1);
        assert_eq!(report.rewritten, 1);
        assert_eq!(report.unresolved, 1);
        assert!(report.warnings.is_empty());
        assert!(restorer.mapping().is_frozen());
    }

    #[test]
    fn empty_token_warns_and_continues() {
        let mut restorer = restorer("5,,9", &[(5, 105), (9, 109)]);
        let report = restorer.after_restore().unwrap();

        assert_eq!(stored_sequence(&restorer), "105,109");
        assert_eq!(
            report.warnings,
            vec![IntegrityWarning::SequenceTokenMismatch {
                question: id(112),
                raw: 3,
                parsed: 2
            }]
        );
    }

    #[test]
    fn nothing_mapped_gives_empty_sequence() {
        let mut restorer = restorer("5,7", &[]);
        let report = restorer.after_restore().unwrap();

        assert_eq!(stored_sequence(&restorer), "");
        assert_eq!(report.unresolved, 2);
    }

    #[test]
    fn shuffle_switched_off_for_plain_multichoice() {
        let mut restorer = restorer("5,7", &[(5, 105), (7, 107)]);
        let store = restorer.store_mut();
        store.add_question(QuestionRecord::new(id(105), "shortanswer", "{1:SHORTANSWER:=Owl}").with_parent(id(112)));
        store.add_question(
            QuestionRecord::new(id(107), "multichoice", "{1:MULTICHOICE:Bow-wow~=Pussy-cat}").with_parent(id(112)),
        );
        store.add_choice_options(ChoiceOptions {
            id: id(70),
            question: id(107),
            shuffle_answers: true,
        });

        let report = restorer.after_restore().unwrap();

        assert_eq!(report.suppressed_shuffles, vec![id(107)]);
        assert!(!restorer.store().options_of(id(107)).unwrap().shuffle_answers);
    }

    #[test]
    fn shuffled_variant_keeps_flag() {
        let mut restorer = restorer("7", &[(7, 107)]);
        let store = restorer.store_mut();
        store.add_question(
            QuestionRecord::new(id(107), "multichoice", "{1:MULTICHOICE_S:Bow-wow~=Pussy-cat}").with_parent(id(112)),
        );
        store.add_choice_options(ChoiceOptions {
            id: id(70),
            question: id(107),
            shuffle_answers: true,
        });

        let report = restorer.after_restore().unwrap();

        assert!(report.suppressed_shuffles.is_empty());
        assert!(restorer.store().options_of(id(107)).unwrap().shuffle_answers);
    }

    fn restorer_with_choice_child(qtype: &str, text: &str) -> ClozeRestorer<MemoryStore> {
        let mut restorer = restorer("7", &[(7, 107)]);
        let store = restorer.store_mut();
        store.add_question(QuestionRecord::new(id(107), qtype, text).with_parent(id(112)));
        store.add_choice_options(ChoiceOptions {
            id: id(70),
            question: id(107),
            shuffle_answers: true,
        });
        restorer
    }

    #[test]
    fn plain_descriptor_on_other_type_keeps_flag() {
        let mut restorer = restorer_with_choice_child("gapselect", "{1:MC:Bow-wow~=Pussy-cat}");

        let report = restorer.after_restore().unwrap();

        assert!(report.suppressed_shuffles.is_empty());
        assert!(restorer.store().options_of(id(107)).unwrap().shuffle_answers);
    }

    #[test]
    fn multichoice_without_descriptor_keeps_flag() {
        let mut restorer = restorer_with_choice_child("multichoice", "Which animal sang to the Owl?");

        let report = restorer.after_restore().unwrap();

        assert!(report.suppressed_shuffles.is_empty());
        assert!(restorer.store().options_of(id(107)).unwrap().shuffle_answers);
    }

    #[test]
    fn second_correction_rejected() {
        let mut restorer = restorer("5,7,9", &[(5, 105), (9, 109)]);
        restorer.after_restore().unwrap();
        assert!(restorer.is_corrected());

        let err = restorer.after_restore().unwrap_err();

        assert!(matches!(err, RestoreError::AlreadyCorrected));
        assert!(err.is_batch_fatal());
        assert_eq!(stored_sequence(&restorer), "105,109");
    }

    #[test]
    fn composite_of_matched_question_untouched() {
        let mapping = Arc::new(MappingTable::new());
        mapping.set_mapping(&Namespace::question(), id(5), id(105)).unwrap();
        let mut store = MemoryStore::new();
        store.insert_composite(id(50), "5").unwrap();
        let mut restorer = ClozeRestorer::new(store, mapping);

        let report = restorer.after_restore().unwrap();

        assert_eq!(report.composites, 0);
        assert_eq!(restorer.store().composite(id(50)).unwrap().unwrap().sequence, "5");
    }
}
