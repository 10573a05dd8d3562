//! Built-in recoders

use crate::error::DelegationError;
use crate::recoder::{RecodeContext, SubquestionRecoder, SubquestionState};
use cloze_codec::{RecordId, ResponseFields};
use cloze_mapping::Namespace;

/// Response field holding a choice question's shuffled answer-id order
pub const ORDER_FIELD: &str = "_order";

/// Recoder for types whose answers are plain text or numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRecoder;

impl SubquestionRecoder for PassthroughRecoder {
    fn recode_response(
        &self,
        _ctx: &RecodeContext<'_>,
        _question: RecordId,
        _attempt_sequence: u32,
        fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError> {
        Ok(fields)
    }

    fn recode_legacy_answer(
        &self,
        _ctx: &RecodeContext<'_>,
        state: &SubquestionState,
    ) -> Result<String, DelegationError> {
        Ok(state.answer.clone())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Recoder for choice types whose data references answer rows
///
/// - Response: the [`ORDER_FIELD`] list of answer ids is mapped, answers
///   that were not restored are dropped from the order.
/// - Legacy: the value is either `ids` or `order:ids`, each a comma list of
///   answer ids. Unmapped ids are kept as stored.
#[derive(Debug, Clone)]
pub struct ChoiceRecoder {
    answers: Namespace,
}

impl ChoiceRecoder {
    /// Create recoder resolving answer ids in `answers`
    #[inline]
    #[must_use]
    pub fn new(answers: Namespace) -> Self {
        Self { answers }
    }

    fn map_ids(&self, ctx: &RecodeContext<'_>, question: RecordId, ids: &str) -> String {
        ids.split(',')
            .map(|token| match ctx.mapping.resolve_token(&self.answers, token) {
                Some(new_id) => new_id.to_string(),
                None => {
                    if !token.is_empty() {
                        tracing::warn!(%question, answer = token, "choice answer not restored, kept as stored");
                    }
                    token.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for ChoiceRecoder {
    fn default() -> Self {
        Self::new(Namespace::question_answer())
    }
}

impl SubquestionRecoder for ChoiceRecoder {
    fn recode_response(
        &self,
        ctx: &RecodeContext<'_>,
        question: RecordId,
        _attempt_sequence: u32,
        mut fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError> {
        if let Some(order) = fields.get_mut(ORDER_FIELD) {
            let mut recoded = Vec::new();
            for token in order.split(',').filter(|t| !t.is_empty()) {
                let old_id = token
                    .parse::<RecordId>()
                    .map_err(|e| DelegationError::failed("multichoice", question, e.to_string()))?;
                match ctx.mapping.resolve(&self.answers, old_id) {
                    Some(new_id) => recoded.push(new_id.to_string()),
                    None => tracing::debug!(%question, %old_id, "answer dropped from choice order"),
                }
            }
            *order = recoded.join(",");
        }
        Ok(fields)
    }

    fn recode_legacy_answer(
        &self,
        ctx: &RecodeContext<'_>,
        state: &SubquestionState,
    ) -> Result<String, DelegationError> {
        let recoded = match state.answer.split_once(':') {
            Some((order, chosen)) => format!(
                "{}:{}",
                self.map_ids(ctx, state.question, order),
                self.map_ids(ctx, state.question, chosen)
            ),
            None => self.map_ids(ctx, state.question, &state.answer),
        };
        Ok(recoded)
    }

    fn name(&self) -> &'static str {
        "choice"
    }
}
