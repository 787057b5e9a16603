use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::ops::Range;

use super::code::{Code, Symbol, Table, MAX_CODE_LENGTH};
use crate::error::Error;
use crate::Result;

/// Build a Shannon-Fano table from relative symbol weights.
///
/// The weights don't need to sum up to one. Symbols are sorted by
/// descending weight (ties broken by ascending symbol) and the sorted list
/// is split recursively: the left part of each split gets a 0 bit, the
/// right part a 1 bit.
pub fn build_table<S: Symbol>(probabilities: &BTreeMap<S, f64>) -> Result<Table<S>> {
    let mut codes = collect_codes(probabilities)?;
    sort_by_descending_probability(&mut codes);
    if codes.len() == 1 {
        // a lone symbol still costs one bit, otherwise its count is lost
        codes[0].push_bit(false);
    } else {
        divide(&mut codes)?;
    }
    let table = Table::from_codes(codes);
    log::debug!(
        "built table with {} entries, longest code {} bits",
        table.len(),
        table.max_code_length()
    );
    Ok(table)
}

/// Build a table from the symbol frequencies of a sequence
pub fn build_table_from_sequence<S, I>(symbols: I) -> Result<Table<S>>
where
    S: Symbol,
    I: IntoIterator,
    I::Item: Borrow<S>,
{
    let mut frequencies: BTreeMap<S, usize> = BTreeMap::new();
    let mut total: usize = 0;
    for symbol in symbols {
        let symbol: &S = symbol.borrow();
        *frequencies.entry(symbol.clone()).or_insert(0) += 1;
        total += 1;
    }
    let probabilities = frequencies
        .into_iter()
        .map(|(symbol, count)| (symbol, count as f64 / total as f64))
        .collect();
    build_table(&probabilities)
}

/// Build a table from symbols ordered from most to least frequent.
///
/// Position `i` of `n` gets the weight `(n - i) / (n(n-1)/2 + n)`, weights of
/// repeated symbols are summed.
pub fn build_table_from_ranked_list<S, I>(ranked_symbols: I) -> Result<Table<S>>
where
    S: Symbol,
    I: IntoIterator,
    I::Item: Borrow<S>,
{
    let ranked_symbols: Vec<I::Item> = ranked_symbols.into_iter().collect();
    let n = ranked_symbols.len();
    let triangular = (n * n.saturating_sub(1) / 2 + n) as f64;
    let mut probabilities: BTreeMap<S, f64> = BTreeMap::new();
    for (index, symbol) in ranked_symbols.into_iter().enumerate() {
        let symbol: &S = symbol.borrow();
        *probabilities.entry(symbol.clone()).or_insert(0.0) += (n - index) as f64 / triangular;
    }
    build_table(&probabilities)
}

impl<S: Symbol> Table<S> {
    pub fn from_probabilities(probabilities: &BTreeMap<S, f64>) -> Result<Self> {
        build_table(probabilities)
    }

    pub fn from_sequence<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        build_table_from_sequence(symbols)
    }

    pub fn from_ranked_list<I>(ranked_symbols: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        build_table_from_ranked_list(ranked_symbols)
    }
}

fn collect_codes<S: Symbol>(probabilities: &BTreeMap<S, f64>) -> Result<Vec<Code<S>>> {
    probabilities
        .iter()
        .map(|(symbol, &probability)| {
            if probability.is_finite() && probability >= 0.0 {
                Ok(Code::new(symbol.clone(), probability))
            } else {
                Err(Error::InvalidInput(format!("{:?}", symbol), probability))
            }
        })
        .collect()
}

fn sort_by_descending_probability<S: Symbol>(codes: &mut [Code<S>]) {
    codes.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

/// Greedy pivot scan over a list sorted by descending probability.
///
/// The pivot moves right as long as the difference between both halves
/// stays below `best` and keeps shrinking, and stops at the first position
/// that does not improve it. `best` starts at the weight of the whole
/// table, so a split whose difference equals the full weight is never
/// taken. The result is always in `1..codes.len()` for two or more codes.
fn find_pivot<S>(codes: &[Code<S>], initial_best: f64) -> usize {
    let total: f64 = codes.iter().map(|code| code.probability).sum();
    let mut left = codes[0].probability;
    let mut best = initial_best;
    let mut pivot = 1;
    while pivot < codes.len() - 1 {
        let difference = ((total - left) - left).abs();
        if difference >= best {
            break;
        }
        best = difference;
        left += codes[pivot].probability;
        pivot += 1;
    }
    pivot
}

fn divide<S: Symbol>(codes: &mut [Code<S>]) -> Result<()> {
    let total: f64 = codes.iter().map(|code| code.probability).sum();
    let initial_best = if total > 0.0 { total } else { f64::INFINITY };
    let mut pending: Vec<Range<usize>> = vec![0..codes.len()];
    while let Some(range) = pending.pop() {
        if range.len() < 2 {
            continue;
        }
        let partition = &mut codes[range.clone()];
        let pivot = find_pivot(partition, initial_best);
        for (index, code) in partition.iter_mut().enumerate() {
            code.push_bit(index >= pivot);
            if code.length > MAX_CODE_LENGTH {
                return Err(Error::CodeTooLong(format!("{:?}", code.symbol), code.length));
            }
        }
        pending.push(range.start + pivot..range.end);
        pending.push(range.start..range.start + pivot);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::{build_table, build_table_from_ranked_list, build_table_from_sequence, find_pivot};
    use crate::error::Error;
    use crate::shannon_fano::code::{Code, Table};

    fn assert_code(table: &Table<char>, symbol: char, bits: u32, length: usize) {
        let code = table.get(&symbol).expect("symbol missing in table");
        assert_eq!(
            (code.bits, code.length),
            (bits, length),
            "unexpected code for {:?}",
            symbol
        );
    }

    fn weights(pairs: &[(char, f64)]) -> BTreeMap<char, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn two_symbols_from_sequence() {
        let table = build_table_from_sequence::<char, _>("aab".chars()).unwrap();
        assert_eq!(table.len(), 2);
        assert_code(&table, 'a', 0b0, 1);
        assert_code(&table, 'b', 0b1, 1);
        let a = table.get(&'a').unwrap();
        assert!((a.probability - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ranked_list_probabilities() {
        let table = build_table_from_ranked_list::<char, _>(['x', 'y', 'z']).unwrap();
        let expected = [('x', 0.5), ('y', 2.0 / 6.0), ('z', 1.0 / 6.0)];
        for (symbol, probability) in expected {
            let actual = table.get(&symbol).unwrap().probability;
            assert!(
                (actual - probability).abs() < 1e-12,
                "probability of {:?} was {}",
                symbol,
                actual
            );
        }
        assert_code(&table, 'x', 0b00, 2);
        assert_code(&table, 'y', 0b01, 2);
        assert_code(&table, 'z', 0b1, 1);
    }

    #[test]
    fn ranked_list_probabilities_sum_to_one() {
        let ranked: Vec<u32> = (0..100).collect();
        let table = build_table_from_ranked_list::<u32, _>(&ranked).unwrap();
        let sum: f64 = table.iter().map(|code| code.probability).sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn ranked_list_sums_duplicates() {
        let table = build_table_from_ranked_list::<char, _>(['a', 'b', 'a']).unwrap();
        assert_eq!(table.len(), 2);
        let a = table.get(&'a').unwrap().probability;
        assert!((a - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn pivot_stops_after_first_non_improvement() {
        let table =
            build_table(&weights(&[('a', 0.4), ('b', 0.3), ('c', 0.2), ('d', 0.1)])).unwrap();
        assert_code(&table, 'a', 0b00, 2);
        assert_code(&table, 'b', 0b01, 2);
        assert_code(&table, 'c', 0b10, 2);
        assert_code(&table, 'd', 0b11, 2);
    }

    #[test]
    fn pivot_never_passes_last_position() {
        let codes: Vec<Code<char>> = ['a', 'b', 'c', 'd']
            .into_iter()
            .map(|symbol| Code::new(symbol, 0.25))
            .collect();
        assert_eq!(find_pivot(&codes, 1.0), 3);
        assert_eq!(find_pivot(&codes[..2], 1.0), 1);
    }

    #[test]
    fn pivot_rejects_split_as_large_as_total_weight() {
        let codes = vec![
            Code::new('a', 1.0),
            Code::new('b', 0.0),
            Code::new('c', 0.0),
        ];
        assert_eq!(find_pivot(&codes, 1.0), 1);
        assert_eq!(find_pivot(&codes, f64::INFINITY), 2);
    }

    #[test]
    fn equal_weights_use_symbol_order() {
        let table = build_table(&weights(&[('d', 1.0), ('b', 1.0), ('c', 1.0), ('a', 1.0)]))
            .unwrap();
        assert_code(&table, 'a', 0b000, 3);
        assert_code(&table, 'b', 0b001, 3);
        assert_code(&table, 'c', 0b01, 2);
        assert_code(&table, 'd', 0b1, 1);
    }

    #[test]
    fn weights_need_not_be_normalized() {
        let normalized = build_table(&weights(&[('a', 0.5), ('b', 0.25), ('c', 0.25)])).unwrap();
        let scaled = build_table(&weights(&[('a', 50.0), ('b', 25.0), ('c', 25.0)])).unwrap();
        for code in normalized.iter() {
            let other = scaled.get(&code.symbol).unwrap();
            assert_eq!((code.bits, code.length), (other.bits, other.length));
        }
    }

    #[test]
    fn zero_probability_is_accepted() {
        let table = build_table(&weights(&[('a', 1.0), ('b', 0.0), ('c', 0.0)])).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_prefix_free());
        assert_code(&table, 'a', 0b0, 1);
        assert_code(&table, 'b', 0b10, 2);
        assert_code(&table, 'c', 0b11, 2);
    }

    #[test]
    fn dominant_weight_is_split_off_at_any_scale() {
        let table = build_table(&weights(&[('a', 40.0), ('b', 0.0), ('c', 0.0)])).unwrap();
        assert_code(&table, 'a', 0b0, 1);
        assert_code(&table, 'b', 0b10, 2);
        assert_code(&table, 'c', 0b11, 2);
    }

    #[test]
    fn all_zero_weights_still_build() {
        let table = build_table(&weights(&[('a', 0.0), ('b', 0.0), ('c', 0.0)])).unwrap();
        assert_code(&table, 'a', 0b00, 2);
        assert_code(&table, 'b', 0b01, 2);
        assert_code(&table, 'c', 0b1, 1);
    }

    #[test]
    fn negative_probability_is_rejected() {
        let result = build_table(&weights(&[('a', 0.5), ('b', -0.1)]));
        match result {
            Err(Error::InvalidInput(symbol, probability)) => {
                assert_eq!(symbol, "'b'");
                assert_eq!(probability, -0.1);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_probability_is_rejected() {
        let result = build_table(&weights(&[('a', f64::NAN), ('b', 0.1)]));
        assert!(matches!(result, Err(Error::InvalidInput(_, _))));
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let table = build_table_from_sequence::<char, _>("aaaa".chars()).unwrap();
        assert_code(&table, 'a', 0b0, 1);
    }

    #[test]
    fn empty_input_builds_empty_table() {
        let table = build_table_from_sequence::<char, _>("".chars()).unwrap();
        assert!(table.is_empty());
        let table = build_table_from_ranked_list::<char, _>(Vec::<char>::new()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn codes_deeper_than_a_word_are_rejected() {
        let probabilities: BTreeMap<u32, f64> = (0..70u32)
            .map(|symbol| (symbol, 0.5f64.powi(symbol as i32)))
            .collect();
        let result = build_table(&probabilities);
        assert!(matches!(result, Err(Error::CodeTooLong(_, 33))));
    }

    #[test]
    fn construction_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog";
        let first = build_table_from_sequence::<char, _>(text.chars()).unwrap();
        let second = build_table_from_sequence::<char, _>(text.chars()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sequence_table_covers_distinct_symbols() {
        let text = "mississippi";
        let table = build_table_from_sequence::<char, _>(text.chars()).unwrap();
        let symbols: Vec<char> = table.iter().map(|code| code.symbol).collect();
        assert_eq!(symbols, vec!['i', 'm', 'p', 's']);
        assert!(table.is_prefix_free());
    }
}
