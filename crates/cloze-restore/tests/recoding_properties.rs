//! Recoding properties over generated sequences and answers

use cloze_mapping::{MappingTable, Namespace};
use cloze_restore::{ClozeRestorer, LegacyState, MemoryStore, QuestionRecord, RestoreStore};
use cloze_test_utils::id;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

const COMPOSITE: u64 = 1;

proptest! {
    /// The corrected sequence is the mapped subsequence of the original
    #[test]
    fn corrected_sequence_keeps_mapped_order(
        children in prop::collection::vec((2u64..500, any::<bool>()), 0..12)
    ) {
        let mapping = Arc::new(MappingTable::new());
        mapping.set_mapping(&Namespace::question_created(), id(COMPOSITE), id(COMPOSITE)).unwrap();

        let mut mapped = BTreeMap::new();
        for (old, keep) in &children {
            if *keep {
                mapped.entry(*old).or_insert(*old + 1000);
            }
        }
        for (old, new) in &mapped {
            mapping.set_mapping(&Namespace::question(), id(*old), id(*new)).unwrap();
        }

        let raw = children.iter().map(|(old, _)| old.to_string()).collect::<Vec<_>>().join(",");
        let mut store = MemoryStore::new();
        store.insert_composite(id(COMPOSITE), &raw).unwrap();
        let mut restorer = ClozeRestorer::new(store, mapping);
        restorer.after_restore().unwrap();

        let expected = children
            .iter()
            .filter_map(|(old, _)| mapped.get(old))
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let row = restorer.store().composite(id(COMPOSITE)).unwrap().unwrap();
        prop_assert_eq!(row.sequence, expected);
    }

    /// Pair count, order and positions survive legacy recoding
    #[test]
    fn legacy_recode_keeps_pairs(
        pairs in prop::collection::vec((1usize..6, "[A-Za-z-]{0,8}"), 1..8)
    ) {
        let mut store = MemoryStore::new();
        store.insert_composite(id(COMPOSITE), "10,11,12").unwrap();
        for child in 10..13 {
            store.add_question(QuestionRecord::new(id(child), "shortanswer", "").with_parent(id(COMPOSITE)));
        }
        let restorer = ClozeRestorer::new(store, Arc::new(MappingTable::new()));

        let answer = pairs
            .iter()
            .map(|(position, value)| format!("{position}-{value}"))
            .collect::<Vec<_>>()
            .join(",");
        let outcome = restorer.recode_legacy_answer(&LegacyState::new(id(COMPOSITE), answer.clone())).unwrap();

        prop_assert_eq!(&outcome.answer, &answer);
        let out_of_range = pairs.iter().filter(|(position, _)| *position > 3).count();
        prop_assert_eq!(outcome.skipped.len(), out_of_range);
    }
}
