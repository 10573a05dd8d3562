//! Sub-question recoder trait

use crate::error::DelegationError;
use cloze_codec::{RecordId, ResponseFields};
use cloze_mapping::MappingTable;

/// Read-only state shared with every recoder call
#[derive(Debug, Clone, Copy)]
pub struct RecodeContext<'a> {
    /// Frozen id mappings of the restore run
    pub mapping: &'a MappingTable,
}

impl<'a> RecodeContext<'a> {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(mapping: &'a MappingTable) -> Self {
        Self { mapping }
    }
}

/// Legacy state of one sub-question, cut out of the composite answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubquestionState {
    /// Sub-question id (already the restored id)
    pub question: RecordId,

    /// That position's value from the composite answer
    pub answer: String,
}

impl SubquestionState {
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

/// Type-specific recoding of sub-question answer data
///
/// Implementations are called once per sub-question position (responses)
/// or once per answer pair (legacy states). Their output is used verbatim.
pub trait SubquestionRecoder: Send + Sync + std::fmt::Debug {
    /// Recode the unprefixed response fields of one sub-question
    ///
    /// # Errors
    /// Returns [`DelegationError::Failed`] if the fields cannot be recoded
    fn recode_response(
        &self,
        ctx: &RecodeContext<'_>,
        question: RecordId,
        attempt_sequence: u32,
        fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError>;

    /// Recode one legacy answer value
    ///
    /// # Errors
    /// Returns [`DelegationError::Failed`] if the value cannot be recoded
    fn recode_legacy_answer(
        &self,
        ctx: &RecodeContext<'_>,
        state: &SubquestionState,
    ) -> Result<String, DelegationError>;

    /// Recoder name (for logs)
    fn name(&self) -> &'static str;
}
