// File: src/core/cost.rs
//! The two-part description length.
//!
//! The dictionary is billed as if every entry were spelled out once with a
//! fixed per-letter code; the corpus is billed at `plog(frequency)` per token.

use std::collections::BTreeMap;

/// Bit cost of an item with probability `p`.
pub fn plog(p: f64) -> f64 {
    -p.log2()
}

/// Builds the fixed per-letter code from raw character counts.
///
/// Characters with a zero count are left out, so every cost is finite.
pub fn letter_cost_table(char_counts: &BTreeMap<char, u64>) -> BTreeMap<char, f64> {
    let total: u64 = char_counts.values().sum();
    char_counts
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&c, &count)| (c, plog(count as f64 / total as f64)))
        .collect()
}

/// Cost of spelling `key` with the letter code.
/// Letters missing from the table contribute nothing.
pub fn spelling_cost(key: &str, letter_costs: &BTreeMap<char, f64>) -> f64 {
    key.chars()
        .filter_map(|c| letter_costs.get(&c))
        .sum()
}

/// Dictionary cost of a whole set of keys.
pub fn dictionary_cost<'a, I>(keys: I, letter_costs: &BTreeMap<char, f64>) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| spelling_cost(key, letter_costs))
        .sum()
}

/// Converts counts to a distribution. Returns `None` when the total is zero.
pub fn frequencies(counts: &[u64]) -> Option<Vec<f64>> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }
    Some(counts.iter().map(|&c| c as f64 / total as f64).collect())
}
