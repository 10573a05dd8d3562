//! Attempt batch recoding

use crate::error::RestoreResult;
use crate::legacy::{LegacyRecodeOutcome, LegacyState};
use crate::restorer::ClozeRestorer;
use crate::store::RestoreStore;
use cloze_codec::{RecordId, ResponsePayload};
use serde::{Deserialize, Serialize};

/// One stored attempt step of a composite question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStep {
    /// Composite question (restored id)
    pub question: RecordId,
    /// Step number within the attempt
    #[serde(default)]
    pub attempt_sequence: u32,
    /// Step data
    pub payload: ResponsePayload,
}

/// Attempt data to recode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptItem {
    /// Structured response step
    Response(ResponseStep),
    /// Legacy answer string
    Legacy(LegacyState),
}

impl AttemptItem {
    /// Composite question the item belongs to
    #[must_use]
    pub fn question(&self) -> RecordId {
        match self {
            Self::Response(step) => step.question,
            Self::Legacy(state) => state.question,
        }
    }
}

/// Per-item result of [`ClozeRestorer::recode_attempts`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Response step recoded
    Response {
        /// Composite question
        question: RecordId,
        /// Recoded payload
        payload: ResponsePayload,
    },
    /// Legacy answer recoded
    Legacy {
        /// Composite question
        question: RecordId,
        /// Recoded answer and findings
        outcome: LegacyRecodeOutcome,
    },
    /// Item left as stored
    Failed {
        /// Composite question
        question: RecordId,
        /// Failure description
        error: String,
    },
}

/// Result of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Outcomes in item order
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Number of recoded items
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    /// Number of items left as stored
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ItemOutcome::Failed { .. }))
            .count()
    }
}

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Recode attempt items, isolating record-level failures
    ///
    /// A failing item is logged and reported as [`ItemOutcome::Failed`];
    /// the remaining items are still recoded.
    ///
    /// # Errors
    /// The first batch-fatal error (see [`crate::RestoreError::is_batch_fatal`])
    pub fn recode_attempts(&self, items: &[AttemptItem]) -> RestoreResult<BatchReport> {
        let mut report = BatchReport::default();
        for item in items {
            let question = item.question();
            let result = match item {
                AttemptItem::Response(step) => self
                    .recode_response(step.question, step.attempt_sequence, &step.payload)
                    .map(|payload| ItemOutcome::Response { question, payload }),
                AttemptItem::Legacy(state) => self
                    .recode_legacy_answer(state)
                    .map(|outcome| ItemOutcome::Legacy { question, outcome }),
            };

            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(err) if err.is_batch_fatal() => {
                    self.log.error(Some(question), format!("batch aborted: {err}"));
                    return Err(err);
                }
                Err(err) => {
                    self.log.error(Some(question), err.to_string());
                    report.outcomes.push(ItemOutcome::Failed {
                        question,
                        error: err.to_string(),
                    });
                }
            }
        }

        self.log.info(
            None,
            format!(
                "recoded {} attempt items, {} failed",
                report.succeeded(),
                report.failed()
            ),
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, QuestionRecord};
    use cloze_mapping::MappingTable;
    use std::sync::Arc;

    fn id(value: u64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    #[test]
    fn failure_is_isolated() {
        let mut store = MemoryStore::new();
        store.insert_composite(id(12), "13").unwrap();
        store.add_question(QuestionRecord::new(id(13), "essay", "").with_parent(id(12)));
        store.insert_composite(id(20), "21").unwrap();
        store.add_question(QuestionRecord::new(id(21), "shortanswer", "").with_parent(id(20)));
        let restorer = ClozeRestorer::new(store, Arc::new(MappingTable::new()));

        let items = vec![
            AttemptItem::Legacy(LegacyState::new(id(12), "1-Owl")),
            AttemptItem::Legacy(LegacyState::new(id(20), "1-Owl")),
            AttemptItem::Legacy(LegacyState::new(id(99), "1-Owl")),
        ];
        let report = restorer.recode_attempts(&items).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            &report.outcomes[0],
            ItemOutcome::Failed { error, .. } if error.contains("essay")
        ));
        assert!(matches!(&report.outcomes[1], ItemOutcome::Legacy { outcome, .. } if outcome.answer == "1-Owl"));
    }

    #[test]
    fn attempt_item_json() {
        let json = r#"{"kind": "response", "question": 12, "attempt_sequence": 2, "payload": {"sub1_answer": "Owl"}}"#;
        let item: AttemptItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.question(), id(12));
        match item {
            AttemptItem::Response(step) => assert_eq!(step.payload.get("sub1_answer"), Some("Owl")),
            AttemptItem::Legacy(_) => panic!("expected response step"),
        }
    }
}
