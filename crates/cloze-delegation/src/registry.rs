//! Recoder registry
//!
//! Provides [`RecoderRegistry`] for resolving a sub-question's recoder from
//! its type tag.

use crate::builtin::{ChoiceRecoder, PassthroughRecoder};
use crate::error::DelegationError;
use crate::recoder::{RecodeContext, SubquestionRecoder, SubquestionState};
use cloze_codec::{QuestionType, RecordId, ResponseFields};
use cloze_mapping::Namespace;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of sub-question recoders keyed by question type tag
#[derive(Clone, Default)]
pub struct RecoderRegistry {
    handlers: HashMap<QuestionType, Arc<dyn SubquestionRecoder>>,
}

impl std::fmt::Debug for RecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoderRegistry")
            .field("handler_count", &self.handlers.len())
            .field("types", &self.types())
            .finish()
    }
}

impl RecoderRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Create registry with the built-in recoders
    ///
    /// - `shortanswer`, `numerical`, `regexp` → [`PassthroughRecoder`]
    /// - `multichoice` → [`ChoiceRecoder`] over `question_answer`
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(QuestionType::SHORTANSWER, PassthroughRecoder);
        registry.register(QuestionType::NUMERICAL, PassthroughRecoder);
        registry.register(QuestionType::REGEXP, PassthroughRecoder);
        registry.register(
            QuestionType::MULTICHOICE,
            ChoiceRecoder::new(Namespace::question_answer()),
        );
        registry
    }

    /// Register a recoder, returning the one it replaces
    pub fn register<R: SubquestionRecoder + 'static>(
        &mut self,
        question_type: impl Into<QuestionType>,
        recoder: R,
    ) -> Option<Arc<dyn SubquestionRecoder>> {
        self.register_shared(question_type, Arc::new(recoder))
    }

    /// Register an already shared recoder
    pub fn register_shared(
        &mut self,
        question_type: impl Into<QuestionType>,
        recoder: Arc<dyn SubquestionRecoder>,
    ) -> Option<Arc<dyn SubquestionRecoder>> {
        self.handlers.insert(question_type.into(), recoder)
    }

    /// Check if a recoder exists for the tag
    #[inline]
    #[must_use]
    pub fn contains(&self, question_type: &str) -> bool {
        self.handlers.contains_key(question_type)
    }

    /// Remove recoder
    #[inline]
    pub fn remove(&mut self, question_type: &str) -> bool {
        self.handlers.remove(question_type).is_some()
    }

    /// Registered type tags, sorted
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.handlers.keys().map(QuestionType::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of registered recoders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Recoder for a tag
    ///
    /// # Errors
    /// Returns [`DelegationError::MissingHandler`] for unknown tags
    pub fn get(&self, question_type: &QuestionType) -> Result<&dyn SubquestionRecoder, DelegationError> {
        self.handlers
            .get(question_type)
            .map(|recoder| &**recoder)
            .ok_or_else(|| DelegationError::MissingHandler(question_type.clone()))
    }

    /// Delegate response recoding to the tag's recoder
    ///
    /// # Errors
    /// Missing recoder or recoder failure
    pub fn recode_response(
        &self,
        ctx: &RecodeContext<'_>,
        question_type: &QuestionType,
        question: RecordId,
        attempt_sequence: u32,
        fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError> {
        let recoder = self.get(question_type)?;
        tracing::trace!(
            %question_type,
            %question,
            recoder = recoder.name(),
            fields = fields.len(),
            "delegating response recode"
        );
        recoder.recode_response(ctx, question, attempt_sequence, fields)
    }

    /// Delegate legacy answer recoding to the tag's recoder
    ///
    /// # Errors
    /// Missing recoder or recoder failure
    pub fn recode_legacy_answer(
        &self,
        ctx: &RecodeContext<'_>,
        question_type: &QuestionType,
        state: &SubquestionState,
    ) -> Result<String, DelegationError> {
        let recoder = self.get(question_type)?;
        tracing::trace!(
            %question_type,
            question = %state.question,
            recoder = recoder.name(),
            "delegating legacy answer recode"
        );
        recoder.recode_legacy_answer(ctx, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloze_mapping::MappingTable;

    #[derive(Debug)]
    struct Upper;

    impl SubquestionRecoder for Upper {
        fn recode_response(
            &self,
            _ctx: &RecodeContext<'_>,
            _question: RecordId,
            _attempt_sequence: u32,
            fields: ResponseFields,
        ) -> Result<ResponseFields, DelegationError> {
            Ok(fields
                .into_iter()
                .map(|(k, v)| (k, v.to_uppercase()))
                .collect())
        }

        fn recode_legacy_answer(
            &self,
            _ctx: &RecodeContext<'_>,
            state: &SubquestionState,
        ) -> Result<String, DelegationError> {
            Ok(state.answer.to_uppercase())
        }

        fn name(&self) -> &'static str {
            "upper"
        }
    }

    fn id(value: u64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    #[test]
    fn registry_new_empty() {
        let registry = RecoderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = RecoderRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.types(),
            vec!["multichoice", "numerical", "regexp", "shortanswer"]
        );
    }

    #[test]
    fn registry_register_replaces() {
        let mut registry = RecoderRegistry::with_defaults();
        let previous = registry.register("shortanswer", Upper);
        assert_eq!(previous.map(|r| r.name()), Some("passthrough"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn registry_remove() {
        let mut registry = RecoderRegistry::with_defaults();
        assert!(registry.remove("numerical"));
        assert!(!registry.contains("numerical"));
        assert!(!registry.remove("numerical"));
    }

    #[test]
    fn missing_handler_is_error() {
        let registry = RecoderRegistry::new();
        let mapping = MappingTable::new();
        let ctx = RecodeContext::new(&mapping);

        let err = registry
            .recode_legacy_answer(&ctx, &"essay".into(), &SubquestionState::new(id(1), "x"))
            .unwrap_err();
        assert_eq!(err, DelegationError::MissingHandler("essay".into()));
    }

    #[test]
    fn delegates_to_registered_handler() {
        let mut registry = RecoderRegistry::new();
        registry.register("custom", Upper);
        let mapping = MappingTable::new();
        let ctx = RecodeContext::new(&mapping);

        let answer = registry
            .recode_legacy_answer(&ctx, &"custom".into(), &SubquestionState::new(id(1), "owl"))
            .unwrap();
        assert_eq!(answer, "OWL");
    }

    #[test]
    fn debug_lists_types() {
        let registry = RecoderRegistry::with_defaults();
        let debug = format!("{registry:?}");
        assert!(debug.contains("handler_count: 4"));
    }
}
