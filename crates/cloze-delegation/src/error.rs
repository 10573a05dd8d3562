//! Delegation errors

use cloze_codec::{QuestionType, RecordId};

/// Errors raised while handing a sub-question to its recoder
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelegationError {
    /// No recoder registered for the type tag
    #[error("no recoder registered for question type '{0}'")]
    MissingHandler(QuestionType),

    /// The recoder itself failed
    #[error("{question_type} recoder failed for question {question}: {message}")]
    Failed {
        /// Type tag of the failing recoder
        question_type: QuestionType,
        /// Sub-question being recoded
        question: RecordId,
        /// Recoder's description of the failure
        message: String,
    },
}

impl DelegationError {
    /// Create recoder failure
    #[inline]
    #[must_use]
    pub fn failed(
        question_type: impl Into<QuestionType>,
        question: RecordId,
        message: impl Into<String>,
    ) -> Self {
        Self::Failed {
            question_type: question_type.into(),
            question,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handler_display() {
        let err = DelegationError::MissingHandler("essay".into());
        assert_eq!(err.to_string(), "no recoder registered for question type 'essay'");
    }

    #[test]
    fn failed_display() {
        let err = DelegationError::failed("multichoice", RecordId::new(7).unwrap(), "bad order");
        assert_eq!(
            err.to_string(),
            "multichoice recoder failed for question 7: bad order"
        );
    }
}
