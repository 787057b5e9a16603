use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use shannon_fano_codec::{build_table, build_table_from_ranked_list, Table};

proptest! {
    #[test]
    fn test_round_trip(text in "[a-z ,.]{0,200}") {
        let table = Table::<char>::from_sequence(text.chars()).unwrap();
        prop_assume!(!table.is_empty());
        let encoded = table.encode(text.chars()).unwrap();
        prop_assert_eq!(encoded.words().len(), encoded.total_bits() / 32 + 1);
        let decoded: String = table
            .decode(encoded.words(), encoded.total_bits())
            .unwrap()
            .into_iter()
            .collect();
        prop_assert_eq!(decoded, text);
    }

    #[test]
    fn test_tables_are_prefix_free(
        weights in prop::collection::btree_map(any::<u8>(), 0.0..100.0f64, 1..30),
    ) {
        let table = build_table(&weights).unwrap();
        let codes: Vec<_> = table.iter().collect();
        for (index, first) in codes.iter().enumerate() {
            prop_assert!(first.length >= 1 && first.length <= 32);
            for second in &codes[index + 1..] {
                let shared = first.length.min(second.length);
                let first_prefix = first.bits >> (first.length - shared);
                let second_prefix = second.bits >> (second.length - shared);
                prop_assert_ne!(
                    first_prefix,
                    second_prefix,
                    "codes of {} and {} share a prefix",
                    first.symbol,
                    second.symbol
                );
            }
        }
    }

    #[test]
    fn test_construction_is_deterministic(
        weights in prop::collection::btree_map(any::<u8>(), 0.0..10.0f64, 1..30),
    ) {
        let first = build_table(&weights).unwrap();
        let second = build_table(&weights).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_ranked_probabilities_sum_to_one(
        symbols in prop::collection::btree_set(any::<u16>(), 1..30),
    ) {
        let ranked: Vec<u16> = symbols.into_iter().collect();
        let table = build_table_from_ranked_list::<u16, _>(&ranked).unwrap();
        let sum: f64 = table.iter().map(|code| code.probability).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequence_table_covers_distinct_symbols(data in prop::collection::vec(0..20u8, 0..100)) {
        let table = Table::<u8>::from_sequence(&data).unwrap();
        let expected: BTreeSet<u8> = data.iter().copied().collect();
        let actual: BTreeSet<u8> = table.iter().map(|code| code.symbol).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_decoding_arbitrary_words_fails_safely(
        words in prop::collection::vec(any::<u32>(), 1..8),
        extra_bits in 0..64usize,
    ) {
        let table = Table::<char>::from_sequence("aaaabbbccd".chars()).unwrap();
        let total_bits = (words.len() * 32).saturating_sub(extra_bits);
        match table.decode(&words, total_bits) {
            Ok(decoded) => {
                let encoded = table.encode(&decoded).unwrap();
                prop_assert_eq!(encoded.total_bits(), total_bits);
            }
            Err(failure) => {
                let encoded = table.encode(&failure.partial).unwrap();
                prop_assert!(encoded.total_bits() <= total_bits);
            }
        }
    }
}

#[test]
fn test_table_shared_between_threads() {
    let text = "a table is read-only once built and can be shared freely";
    let table = Arc::new(Table::<char>::from_sequence(text.chars()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|offset| {
            let table = Arc::clone(&table);
            let line: String = text.chars().skip(offset * 5).collect();
            thread::spawn(move || {
                let encoded = table.encode(line.chars()).unwrap();
                let decoded: String = table
                    .decode(encoded.words(), encoded.total_bits())
                    .unwrap()
                    .into_iter()
                    .collect();
                (line, decoded)
            })
        })
        .collect();
    for handle in handles {
        let (line, decoded) = handle.join().unwrap();
        assert_eq!(line, decoded);
    }
}

#[test]
fn test_aab_scenario() {
    let table = Table::<char>::from_sequence("aab".chars()).unwrap();
    let encoded = table.encode("aab".chars()).unwrap();
    assert_eq!(encoded.total_bits(), 3);
    let decoded: String = encoded.decode(&table).unwrap().into_iter().collect();
    assert_eq!(decoded, "aab");
}
