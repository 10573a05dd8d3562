//! Storage seam
//!
//! The relinking steps only read and patch a handful of rows. Backends
//! implement [`RestoreStore`]; [`MemoryStore`] keeps everything in ordered
//! maps and doubles as the JSON snapshot format of the CLI bundle.

use crate::error::StorageError;
use cloze_codec::{QuestionType, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Composite row linking a question to its ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRow {
    /// Row id
    pub id: RecordId,
    /// Owning composite question
    pub question: RecordId,
    /// Comma-separated child ids
    pub sequence: String,
}

/// Question row, only the columns the restore steps read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Question id
    pub id: RecordId,
    /// Composite this question belongs to
    #[serde(default)]
    pub parent: Option<RecordId>,
    /// Type tag
    pub qtype: QuestionType,
    /// Question text, for sub-questions the embedded descriptor
    #[serde(default)]
    pub text: String,
}

impl QuestionRecord {
    /// Create record
    #[must_use]
    pub fn new(id: RecordId, qtype: impl Into<QuestionType>, text: impl Into<String>) -> Self {
        Self {
            id,
            parent: None,
            qtype: qtype.into(),
            text: text.into(),
        }
    }

    /// With composite parent
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: RecordId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Options row of a choice sub-question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOptions {
    /// Row id
    pub id: RecordId,
    /// Owning question
    pub question: RecordId,
    /// Whether answers are shuffled per attempt
    pub shuffle_answers: bool,
}

/// Rows the restore steps read and patch
pub trait RestoreStore {
    /// Insert a composite row, returning its new id
    ///
    /// # Errors
    /// Backend failure
    fn insert_composite(&mut self, question: RecordId, sequence: &str) -> Result<RecordId, StorageError>;

    /// Composite row owned by `question`
    ///
    /// # Errors
    /// Backend failure
    fn composite(&self, question: RecordId) -> Result<Option<CompositeRow>, StorageError>;

    /// Replace a composite row's sequence
    ///
    /// # Errors
    /// [`StorageError::NotFound`] for unknown rows, or backend failure
    fn set_composite_sequence(&mut self, row: RecordId, sequence: &str) -> Result<(), StorageError>;

    /// Existing questions among `ids`, ascending by id
    ///
    /// # Errors
    /// Backend failure
    fn questions(&self, ids: &[RecordId]) -> Result<Vec<QuestionRecord>, StorageError>;

    /// Type tag of every child whose parent is `parent`
    ///
    /// # Errors
    /// Backend failure
    fn child_types(&self, parent: RecordId) -> Result<BTreeMap<RecordId, QuestionType>, StorageError>;

    /// Type tag of one question
    ///
    /// # Errors
    /// Backend failure
    fn question_type(&self, id: RecordId) -> Result<Option<QuestionType>, StorageError>;

    /// Choice options of a question
    ///
    /// # Errors
    /// Backend failure
    fn choice_options(&self, question: RecordId) -> Result<Option<ChoiceOptions>, StorageError>;

    /// Set the shuffle flag of an options row
    ///
    /// # Errors
    /// [`StorageError::NotFound`] for unknown rows, or backend failure
    fn set_shuffle_answers(&mut self, options: RecordId, shuffle: bool) -> Result<(), StorageError>;
}

/// Serialized form of [`MemoryStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    questions: Vec<QuestionRecord>,
    #[serde(default)]
    composites: Vec<CompositeRow>,
    #[serde(default)]
    choice_options: Vec<ChoiceOptions>,
}

/// In-memory [`RestoreStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Snapshot", into = "Snapshot")]
pub struct MemoryStore {
    questions: BTreeMap<RecordId, QuestionRecord>,
    composites: BTreeMap<RecordId, CompositeRow>,
    choice_options: BTreeMap<RecordId, ChoiceOptions>,
}

impl From<Snapshot> for MemoryStore {
    fn from(snapshot: Snapshot) -> Self {
        let mut store = Self::new();
        for question in snapshot.questions {
            store.add_question(question);
        }
        for row in snapshot.composites {
            store.composites.insert(row.id, row);
        }
        for options in snapshot.choice_options {
            store.add_choice_options(options);
        }
        store
    }
}

impl From<MemoryStore> for Snapshot {
    fn from(store: MemoryStore) -> Self {
        Self {
            questions: store.questions.into_values().collect(),
            composites: store.composites.into_values().collect(),
            choice_options: store.choice_options.into_values().collect(),
        }
    }
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a question
    pub fn add_question(&mut self, question: QuestionRecord) {
        self.questions.insert(question.id, question);
    }

    /// Add or replace the options of a question
    pub fn add_choice_options(&mut self, options: ChoiceOptions) {
        self.choice_options.insert(options.question, options);
    }

    /// Question by id
    #[must_use]
    pub fn question(&self, id: RecordId) -> Option<&QuestionRecord> {
        self.questions.get(&id)
    }

    /// All composite rows, ascending by row id
    pub fn composite_rows(&self) -> impl Iterator<Item = &CompositeRow> {
        self.composites.values()
    }

    /// Options of a question
    #[must_use]
    pub fn options_of(&self, question: RecordId) -> Option<&ChoiceOptions> {
        self.choice_options.get(&question)
    }

    fn next_composite_id(&self) -> Result<RecordId, StorageError> {
        let next = match self.composites.keys().next_back() {
            Some(last) => last.get().checked_add(1),
            None => Some(1),
        };
        next.and_then(RecordId::new)
            .ok_or_else(|| StorageError::Backend("composite id space exhausted".into()))
    }
}

impl RestoreStore for MemoryStore {
    fn insert_composite(&mut self, question: RecordId, sequence: &str) -> Result<RecordId, StorageError> {
        let id = self.next_composite_id()?;
        self.composites.insert(
            id,
            CompositeRow {
                id,
                question,
                sequence: sequence.to_string(),
            },
        );
        Ok(id)
    }

    fn composite(&self, question: RecordId) -> Result<Option<CompositeRow>, StorageError> {
        Ok(self
            .composites
            .values()
            .find(|row| row.question == question)
            .cloned())
    }

    fn set_composite_sequence(&mut self, row: RecordId, sequence: &str) -> Result<(), StorageError> {
        let composite = self.composites.get_mut(&row).ok_or(StorageError::NotFound {
            entity: "composite",
            id: row,
        })?;
        composite.sequence = sequence.to_string();
        Ok(())
    }

    fn questions(&self, ids: &[RecordId]) -> Result<Vec<QuestionRecord>, StorageError> {
        let mut found: Vec<_> = ids
            .iter()
            .filter_map(|id| self.questions.get(id))
            .cloned()
            .collect();
        found.sort_by_key(|question| question.id);
        found.dedup_by_key(|question| question.id);
        Ok(found)
    }

    fn child_types(&self, parent: RecordId) -> Result<BTreeMap<RecordId, QuestionType>, StorageError> {
        Ok(self
            .questions
            .values()
            .filter(|question| question.parent == Some(parent))
            .map(|question| (question.id, question.qtype.clone()))
            .collect())
    }

    fn question_type(&self, id: RecordId) -> Result<Option<QuestionType>, StorageError> {
        Ok(self.questions.get(&id).map(|question| question.qtype.clone()))
    }

    fn choice_options(&self, question: RecordId) -> Result<Option<ChoiceOptions>, StorageError> {
        Ok(self.choice_options.get(&question).copied())
    }

    fn set_shuffle_answers(&mut self, options: RecordId, shuffle: bool) -> Result<(), StorageError> {
        let row = self
            .choice_options
            .values_mut()
            .find(|row| row.id == options)
            .ok_or(StorageError::NotFound {
                entity: "choice options",
                id: options,
            })?;
        row.shuffle_answers = shuffle;
        Ok(())
    }
}
