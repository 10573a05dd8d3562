//! Legacy answer codec properties

use cloze_codec::{LegacyAnswer, PairEntry};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    // Values may carry hyphens, never the pair separator
    "[A-Za-z0-9 .-]{0,12}"
}

proptest! {
    #[test]
    fn pair_count_and_positions_survive_value_rewrite(
        values in proptest::collection::vec(value_strategy(), 1..10)
    ) {
        let raw = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}-{v}", i + 1))
            .collect::<Vec<_>>()
            .join(",");

        let parsed = LegacyAnswer::parse(&raw);
        prop_assert_eq!(parsed.len(), values.len());

        let rewritten: Vec<PairEntry> = parsed
            .entries()
            .iter()
            .map(|entry| match entry {
                PairEntry::Pair(pair) => PairEntry::Pair(pair.with_value(pair.value().to_uppercase())),
                PairEntry::Malformed(raw) => PairEntry::Malformed(raw.clone()),
            })
            .collect();
        let recoded = LegacyAnswer::from_entries(rewritten).to_string();
        let reparsed = LegacyAnswer::parse(&recoded);

        prop_assert_eq!(reparsed.len(), parsed.len());
        for (before, after) in parsed.entries().iter().zip(reparsed.entries()) {
            match (before, after) {
                (PairEntry::Pair(a), PairEntry::Pair(b)) => {
                    prop_assert_eq!(a.position_text(), b.position_text());
                    prop_assert_eq!(a.value().to_uppercase(), b.value());
                }
                _ => prop_assert!(false, "pair shape changed"),
            }
        }
    }

    #[test]
    fn value_keeps_everything_after_first_hyphen(value in value_strategy()) {
        let raw = format!("3-{value}");
        let parsed = LegacyAnswer::parse(&raw);
        match parsed.entries() {
            [PairEntry::Pair(pair)] => {
                prop_assert_eq!(pair.position().unwrap(), 3);
                prop_assert_eq!(pair.value(), value.as_str());
            }
            other => prop_assert!(false, "unexpected entries {:?}", other),
        }
    }
}
