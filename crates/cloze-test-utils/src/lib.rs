//! Testing utilities for the cloze restore workspace
//!
//! Shared fixtures and test doubles.

#![allow(missing_docs)]

use cloze_codec::{QuestionType, RecordId, ResponseFields};
use cloze_delegation::{DelegationError, RecodeContext, SubquestionRecoder, SubquestionState};
use cloze_mapping::{MappingTable, Namespace};
use cloze_restore::{
    ChoiceOptions, CompositeData, CompositeRow, MemoryStore, QuestionRecord, RestoreStore, StorageError,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const OWL_TEXT: &str = "The Owl and the Pussy-cat went to sea in a beautiful {#1} boat. \
    The Owl looked up to the stars above and sang to a small guitar: {#2}";
pub const SHORTANSWER_TEXT: &str = "{1:SHORTANSWER:Dog#Wrong, silly!~=Owl#Well done!~*#Wrong answer}";
pub const MULTICHOICE_TEXT: &str =
    "{1:MULTICHOICE:Bow-wow#You seem to have a dog obsessions!~Wiggly worm#Now you are just being ridiculous!~=Pussy-cat#Well done!}";

pub const OLD_COMPOSITE_ROW: u64 = 3;
pub const OLD_QUESTION: u64 = 12;
pub const OLD_SHORTANSWER: u64 = 13;
pub const OLD_MULTICHOICE: u64 = 14;
pub const OLD_ANSWERS: [u64; 3] = [23, 24, 25];

pub const NEW_QUESTION: u64 = 112;
pub const NEW_SHORTANSWER: u64 = 113;
pub const NEW_MULTICHOICE: u64 = 114;
pub const NEW_ANSWERS: [u64; 3] = [123, 124, 125];
pub const CHOICE_OPTIONS: u64 = 40;

pub fn id(value: u64) -> RecordId {
    RecordId::new(value).unwrap()
}

/// Two sub-question composite after its records were created
///
/// The store holds the new questions but no composite row yet; feed
/// [`OwlFixture::composite`] through `process_composite` first.
#[derive(Debug)]
pub struct OwlFixture {
    pub mapping: Arc<MappingTable>,
    pub store: MemoryStore,
    pub composite: CompositeData,
}

pub fn owl_fixture() -> OwlFixture {
    let mapping = Arc::new(MappingTable::new());
    let question = Namespace::question();
    for (old, new) in [
        (OLD_QUESTION, NEW_QUESTION),
        (OLD_SHORTANSWER, NEW_SHORTANSWER),
        (OLD_MULTICHOICE, NEW_MULTICHOICE),
    ] {
        mapping.set_mapping(&question, id(old), id(new)).unwrap();
        mapping
            .set_mapping(&Namespace::question_created(), id(old), id(new))
            .unwrap();
    }
    for (old, new) in OLD_ANSWERS.iter().zip(NEW_ANSWERS) {
        mapping
            .set_mapping(&Namespace::question_answer(), id(*old), id(new))
            .unwrap();
    }

    let mut store = MemoryStore::new();
    store.add_question(QuestionRecord::new(id(NEW_QUESTION), QuestionType::MULTIANSWERRGX, OWL_TEXT));
    store.add_question(
        QuestionRecord::new(id(NEW_SHORTANSWER), QuestionType::SHORTANSWER, SHORTANSWER_TEXT)
            .with_parent(id(NEW_QUESTION)),
    );
    store.add_question(
        QuestionRecord::new(id(NEW_MULTICHOICE), QuestionType::MULTICHOICE, MULTICHOICE_TEXT)
            .with_parent(id(NEW_QUESTION)),
    );
    store.add_choice_options(ChoiceOptions {
        id: id(CHOICE_OPTIONS),
        question: id(NEW_MULTICHOICE),
        shuffle_answers: true,
    });

    OwlFixture {
        mapping,
        store,
        composite: CompositeData {
            id: id(OLD_COMPOSITE_ROW),
            question: id(OLD_QUESTION),
            sequence: format!("{OLD_SHORTANSWER},{OLD_MULTICHOICE}"),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Response {
        question: RecordId,
        attempt_sequence: u32,
        fields: ResponseFields,
    },
    Legacy(SubquestionState),
}

/// Recoder translating values through a fixed table, recording every call
///
/// Clones share the call record, so a clone can be registered and the
/// original inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingRecoder {
    translations: Arc<HashMap<String, String>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingRecoder {
    pub fn new<'a>(translations: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            translations: Arc::new(
                translations
                    .into_iter()
                    .map(|(from, to)| (from.to_string(), to.to_string()))
                    .collect(),
            ),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn translate(&self, value: &str) -> String {
        self.translations
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}

impl SubquestionRecoder for RecordingRecoder {
    fn recode_response(
        &self,
        _ctx: &RecodeContext<'_>,
        question: RecordId,
        attempt_sequence: u32,
        fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError> {
        self.calls.lock().push(RecordedCall::Response {
            question,
            attempt_sequence,
            fields: fields.clone(),
        });
        Ok(fields
            .into_iter()
            .map(|(name, value)| {
                let value = self.translate(&value);
                (name, value)
            })
            .collect())
    }

    fn recode_legacy_answer(
        &self,
        _ctx: &RecodeContext<'_>,
        state: &SubquestionState,
    ) -> Result<String, DelegationError> {
        self.calls.lock().push(RecordedCall::Legacy(state.clone()));
        Ok(self.translate(&state.answer))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Recoder that always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRecoder;

impl SubquestionRecoder for FailingRecoder {
    fn recode_response(
        &self,
        _ctx: &RecodeContext<'_>,
        question: RecordId,
        _attempt_sequence: u32,
        _fields: ResponseFields,
    ) -> Result<ResponseFields, DelegationError> {
        Err(DelegationError::failed("failing", question, "refused"))
    }

    fn recode_legacy_answer(
        &self,
        _ctx: &RecodeContext<'_>,
        state: &SubquestionState,
    ) -> Result<String, DelegationError> {
        Err(DelegationError::failed("failing", state.question, "refused"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Store whose reads or writes can be made to fail
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FailingStore {
    pub fn failing_writes(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes: true,
        }
    }

    pub fn failing_reads(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: true,
            fail_writes: false,
        }
    }

    fn read(&self) -> Result<(), StorageError> {
        if self.fail_reads {
            return Err(StorageError::Backend("read refused".into()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Backend("write refused".into()));
        }
        Ok(())
    }
}

impl RestoreStore for FailingStore {
    fn insert_composite(&mut self, question: RecordId, sequence: &str) -> Result<RecordId, StorageError> {
        self.write()?;
        self.inner.insert_composite(question, sequence)
    }

    fn composite(&self, question: RecordId) -> Result<Option<CompositeRow>, StorageError> {
        self.read()?;
        self.inner.composite(question)
    }

    fn set_composite_sequence(&mut self, row: RecordId, sequence: &str) -> Result<(), StorageError> {
        self.write()?;
        self.inner.set_composite_sequence(row, sequence)
    }

    fn questions(&self, ids: &[RecordId]) -> Result<Vec<QuestionRecord>, StorageError> {
        self.read()?;
        self.inner.questions(ids)
    }

    fn child_types(&self, parent: RecordId) -> Result<BTreeMap<RecordId, QuestionType>, StorageError> {
        self.read()?;
        self.inner.child_types(parent)
    }

    fn question_type(&self, id: RecordId) -> Result<Option<QuestionType>, StorageError> {
        self.read()?;
        self.inner.question_type(id)
    }

    fn choice_options(&self, question: RecordId) -> Result<Option<ChoiceOptions>, StorageError> {
        self.read()?;
        self.inner.choice_options(question)
    }

    fn set_shuffle_answers(&mut self, options: RecordId, shuffle: bool) -> Result<(), StorageError> {
        self.write()?;
        self.inner.set_shuffle_answers(options, shuffle)
    }
}
