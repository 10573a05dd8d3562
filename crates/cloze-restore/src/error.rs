//! Error and warning types for the restore pipeline

use cloze_codec::{CodecError, RecordId};
use cloze_delegation::DelegationError;
use cloze_mapping::MappingError;
use serde::Serialize;
use std::path::PathBuf;

/// Result alias for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

/// Storage backend failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Row addressed for update does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of row (`composite`, `choice options`, ...)
        entity: &'static str,
        /// Row id
        id: RecordId,
    },

    /// Backend reported an error
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the config layout
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Restore bundle loading failure
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// File could not be read
    #[error("failed to read bundle {}: {source}", path.display())]
    Read {
        /// Bundle path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// JSON did not match the bundle layout
    #[error("invalid bundle: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while relinking composite questions
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// Storage read or write failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A sub-question recoder failed or is missing
    #[error(transparent)]
    Delegation(#[from] DelegationError),

    /// Mapping table rejected a write
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sequence references a child that has no type
    #[error("composite question {composite} references child {child} which has no question type")]
    UnknownChild {
        /// Owning question of the composite
        composite: RecordId,
        /// Child id from the sequence
        child: RecordId,
    },

    /// No composite row for the question
    #[error("no composite row for question {0}")]
    MissingComposite(RecordId),

    /// Stored sequence holds a token that is not an id
    #[error("stored sequence of question {question} is invalid: {source}")]
    InvalidSequence {
        /// Owning question of the composite
        question: RecordId,
        /// Codec failure
        #[source]
        source: CodecError,
    },

    /// Post-restore correction requested a second time
    #[error("composite sequences were already corrected for this restore")]
    AlreadyCorrected,

    /// Legacy answer pair rejected under [`crate::PositionPolicy::Fail`]
    #[error("{0}")]
    UnusablePair(SkippedPair),
}

impl RestoreError {
    /// Check whether the error must abort the whole batch
    ///
    /// Everything else is scoped to the record being recoded.
    #[must_use]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Mapping(_) | Self::Config(_) | Self::AlreadyCorrected
        )
    }
}

/// Data-integrity finding that is reported without stopping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// Stored sequence contains empty tokens
    #[error("sequence of composite question {question} has {raw} tokens but only {parsed} are usable")]
    SequenceTokenMismatch {
        /// Owning question of the composite
        question: RecordId,
        /// Comma-separated token count
        raw: usize,
        /// Non-empty token count
        parsed: usize,
    },

    /// Legacy answer contains empty pairs
    #[error("legacy answer of question {question} has {raw} tokens but only {parsed} are usable")]
    AnswerTokenMismatch {
        /// Composite question of the answer
        question: RecordId,
        /// Comma-separated token count
        raw: usize,
        /// Non-empty token count
        parsed: usize,
    },
}

/// Why a legacy answer pair could not be delegated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Position is past the end of the sequence
    #[error("position {position} outside sequence of {len}")]
    OutOfRange {
        /// Parsed position
        position: usize,
        /// Sequence length
        len: usize,
    },
    /// Position is not a positive integer
    #[error("position is not a positive integer")]
    InvalidPosition,
    /// Token has no `-` separator
    #[error("missing position separator")]
    Malformed,
}

/// Legacy answer pair carried through without recoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("answer pair '{pair}' of question {question}: {reason}")]
pub struct SkippedPair {
    /// Composite question of the answer
    pub question: RecordId,
    /// Pair text as stored
    pub pair: String,
    /// Why it was skipped
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    #[test]
    fn storage_errors_abort_batch() {
        let err = RestoreError::from(StorageError::Backend("disk full".into()));
        assert!(err.is_batch_fatal());
        assert_eq!(err.to_string(), "storage backend error: disk full");
    }

    #[test]
    fn record_errors_do_not_abort_batch() {
        let unknown = RestoreError::UnknownChild {
            composite: id(12),
            child: id(14),
        };
        assert!(!unknown.is_batch_fatal());

        let delegation = RestoreError::from(DelegationError::MissingHandler("essay".into()));
        assert!(!delegation.is_batch_fatal());
        assert!(!RestoreError::MissingComposite(id(12)).is_batch_fatal());
    }

    #[test]
    fn warning_display() {
        let warning = IntegrityWarning::SequenceTokenMismatch {
            question: id(12),
            raw: 3,
            parsed: 2,
        };
        assert_eq!(
            warning.to_string(),
            "sequence of composite question 12 has 3 tokens but only 2 are usable"
        );
    }

    #[test]
    fn skipped_pair_display() {
        let skipped = SkippedPair {
            question: id(12),
            pair: "7-Owl".into(),
            reason: SkipReason::OutOfRange { position: 7, len: 2 },
        };
        assert_eq!(
            skipped.to_string(),
            "answer pair '7-Owl' of question 12: position 7 outside sequence of 2"
        );
    }
}
