//! Response payload recoding

use crate::error::{RestoreError, RestoreResult};
use crate::restorer::ClozeRestorer;
use crate::store::RestoreStore;
use cloze_codec::{RecordId, ResponsePayload, SubquestionView};

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Recode one attempt step of composite `question`
    ///
    /// Each position's `sub<N>_` fields are handed, prefix stripped, to the
    /// recoder of the child at that position. Returned fields are prefixed
    /// again and overwrite the originals. Fields outside every position
    /// prefix are kept as they are.
    ///
    /// # Errors
    /// - [`RestoreError::MissingComposite`] / [`RestoreError::InvalidSequence`]
    ///   if the composite's sequence cannot be read
    /// - [`RestoreError::UnknownChild`] if a sequence entry has no type
    /// - [`RestoreError::Delegation`] if a recoder fails
    /// - [`RestoreError::Storage`] on backend failure
    pub fn recode_response(
        &self,
        question: RecordId,
        attempt_sequence: u32,
        payload: &ResponsePayload,
    ) -> RestoreResult<ResponsePayload> {
        let child_types = self.store.child_types(question)?;
        let sequence = self.stored_sequence(question)?;
        let ctx = self.recode_context();

        let mut recoded = payload.clone();
        for (position, child) in sequence.positions() {
            let question_type = child_types.get(&child).ok_or(RestoreError::UnknownChild {
                composite: question,
                child,
            })?;
            let view = SubquestionView::new(payload, &self.config.subquestion_prefix, position);
            let fields = self
                .registry
                .recode_response(&ctx, question_type, child, attempt_sequence, view.fields())?;
            tracing::trace!(%question, position, %child, fields = fields.len(), "sub-question response recoded");
            recoded.merge_prefixed(view.prefix(), fields);
        }
        Ok(recoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, QuestionRecord};
    use cloze_mapping::MappingTable;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn id(value: u64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    fn restorer(sequence: &str) -> ClozeRestorer<MemoryStore> {
        let mut store = MemoryStore::new();
        store.insert_composite(id(12), sequence).unwrap();
        store.add_question(QuestionRecord::new(id(13), "shortanswer", "").with_parent(id(12)));
        store.add_question(QuestionRecord::new(id(14), "numerical", "").with_parent(id(12)));
        ClozeRestorer::new(store, Arc::new(MappingTable::new()))
    }

    fn payload(pairs: &[(&str, &str)]) -> ResponsePayload {
        pairs.iter().copied().collect()
    }

    #[test]
    fn passthrough_keeps_payload() {
        let restorer = restorer("13,14");
        let input = payload(&[("sub1_answer", "Owl"), ("sub2_answer", "42"), ("-finish", "1")]);

        let out = restorer.recode_response(id(12), 1, &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn child_without_type_is_unknown() {
        let restorer = restorer("13,99");
        let err = restorer
            .recode_response(id(12), 1, &payload(&[("sub1_answer", "Owl")]))
            .unwrap_err();

        assert!(matches!(
            err,
            RestoreError::UnknownChild { child, .. } if child == id(99)
        ));
    }

    #[test]
    fn missing_composite() {
        let restorer = restorer("13");
        let err = restorer.recode_response(id(77), 1, &ResponsePayload::new()).unwrap_err();
        assert!(matches!(err, RestoreError::MissingComposite(q) if q == id(77)));
    }

    #[test]
    fn garbage_sequence_is_invalid() {
        let restorer = restorer("13,abc");
        let err = restorer.recode_response(id(12), 1, &ResponsePayload::new()).unwrap_err();
        assert!(matches!(err, RestoreError::InvalidSequence { .. }));
    }
}
