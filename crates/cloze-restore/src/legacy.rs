//! Legacy answer recoding
//!
//! Before structured responses, a composite's state was one string of
//! `position-value` pairs such as `1-Dog,2-Pussy-cat`. Positions index the
//! recoded sequence and stay as they are; each value is recoded by the
//! child at that position.

use crate::config::PositionPolicy;
use crate::error::{IntegrityWarning, RestoreError, RestoreResult, SkipReason, SkippedPair};
use crate::restorer::ClozeRestorer;
use crate::store::RestoreStore;
use cloze_codec::{LegacyAnswer, PairEntry, RecordId, ResolvedSequence};
use cloze_delegation::{RecodeContext, SubquestionState};
use serde::{Deserialize, Serialize};

/// Legacy state of a composite question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyState {
    /// Composite question (restored id)
    pub question: RecordId,
    /// Stored answer string
    pub answer: String,
}

impl LegacyState {
    /// Create state
    #[inline]
    #[must_use]
    pub fn new(question: RecordId, answer: impl Into<String>) -> Self {
        Self {
            question,
            answer: answer.into(),
        }
    }
}

/// Result of [`ClozeRestorer::recode_legacy_answer`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyRecodeOutcome {
    /// Recoded answer string
    pub answer: String,
    /// Pairs carried through unchanged
    pub skipped: Vec<SkippedPair>,
    /// Integrity problems found
    pub warnings: Vec<IntegrityWarning>,
}

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Recode a legacy answer string
    ///
    /// Pair count and order are preserved. Pairs whose position is not a
    /// valid index into the sequence are reported and, under
    /// [`PositionPolicy::Skip`], carried through verbatim. Empty pairs are
    /// reported as an integrity warning and omitted.
    ///
    /// # Errors
    /// - [`RestoreError::MissingComposite`] / [`RestoreError::InvalidSequence`]
    ///   if the composite's sequence cannot be read
    /// - [`RestoreError::UnknownChild`] if a referenced child has no type
    /// - [`RestoreError::Delegation`] if a recoder fails
    /// - [`RestoreError::UnusablePair`] under [`PositionPolicy::Fail`]
    /// - [`RestoreError::Storage`] on backend failure
    pub fn recode_legacy_answer(&self, state: &LegacyState) -> RestoreResult<LegacyRecodeOutcome> {
        let sequence = self.stored_sequence(state.question)?;
        let answer = LegacyAnswer::parse(&state.answer);
        let ctx = self.recode_context();

        let mut outcome = LegacyRecodeOutcome::default();
        if !answer.is_consistent() {
            let warning = IntegrityWarning::AnswerTokenMismatch {
                question: state.question,
                raw: answer.raw_token_count(),
                parsed: answer.len(),
            };
            self.log.warn(Some(state.question), warning.to_string());
            outcome.warnings.push(warning);
        }

        let mut entries = Vec::with_capacity(answer.len());
        for entry in answer.entries() {
            match self.recode_entry(&ctx, state.question, &sequence, entry)? {
                Ok(recoded) => entries.push(recoded),
                Err(skipped) => {
                    if self.config.position_policy == PositionPolicy::Fail {
                        return Err(RestoreError::UnusablePair(skipped));
                    }
                    self.log.warn(Some(state.question), skipped.to_string());
                    outcome.skipped.push(skipped);
                    entries.push(entry.clone());
                }
            }
        }

        outcome.answer = LegacyAnswer::from_entries(entries).to_string();
        Ok(outcome)
    }

    /// Recode one pair, `Ok(Err(_))` when it cannot be delegated
    fn recode_entry(
        &self,
        ctx: &RecodeContext<'_>,
        question: RecordId,
        sequence: &ResolvedSequence,
        entry: &PairEntry,
    ) -> RestoreResult<Result<PairEntry, SkippedPair>> {
        let skip = |reason| SkippedPair {
            question,
            pair: entry.to_string(),
            reason,
        };

        let pair = match entry {
            PairEntry::Pair(pair) => pair,
            PairEntry::Malformed(_) => return Ok(Err(skip(SkipReason::Malformed))),
        };
        let Ok(position) = pair.position() else {
            return Ok(Err(skip(SkipReason::InvalidPosition)));
        };
        let Some(child) = sequence.at(position) else {
            return Ok(Err(skip(SkipReason::OutOfRange {
                position,
                len: sequence.len(),
            })));
        };

        let question_type = self
            .store
            .question_type(child)?
            .ok_or(RestoreError::UnknownChild {
                composite: question,
                child,
            })?;
        let value = self.registry.recode_legacy_answer(
            ctx,
            &question_type,
            &SubquestionState::new(child, pair.value()),
        )?;
        tracing::trace!(%question, position, %child, "legacy answer pair recoded");
        Ok(Ok(PairEntry::Pair(pair.with_value(value))))
    }
}
