// --- File: src/core/lexicon.rs
use crate::core::cost;
use crate::core::types::LexiconEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The entry store: known pieces, permanently rejected pieces and the fixed
/// letter code used to bill the dictionary.
///
/// Every character of the corpus keeps an entry with `count >= 1` for the
/// whole run, which gives the parser a character-by-character fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    entries: BTreeMap<String, LexiconEntry>,
    /// Multi-character entries that fell to zero count after a reparse.
    /// Keys here are never admitted again.
    rejected: BTreeMap<String, LexiconEntry>,
    letter_costs: BTreeMap<char, f64>,
    longest_entry_length: usize,
}

impl Lexicon {
    /// Seeds one entry per distinct character and fixes the letter code.
    pub fn from_char_counts(char_counts: &BTreeMap<char, u64>) -> Self {
        let mut lexicon = Self {
            entries: BTreeMap::new(),
            rejected: BTreeMap::new(),
            letter_costs: cost::letter_cost_table(char_counts),
            longest_entry_length: 0,
        };
        for (&c, &count) in char_counts {
            lexicon.insert(LexiconEntry::new(c, count.max(1)));
        }
        lexicon.recompute_frequencies();
        lexicon
    }

    pub fn get(&self, key: &str) -> Option<&LexiconEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_rejected(&self, key: &str) -> bool {
        self.rejected.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.values()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.rejected.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upper bound on the parser's window width, in characters.
    pub fn longest_entry_length(&self) -> usize {
        self.longest_entry_length
    }

    pub fn letter_costs(&self) -> &BTreeMap<char, f64> {
        &self.letter_costs
    }

    /// Adds an entry, widening the parser window if needed.
    /// Rejected keys are refused; returns whether the entry went in.
    pub fn insert(&mut self, entry: LexiconEntry) -> bool {
        if self.rejected.contains_key(&entry.key) {
            return false;
        }
        self.longest_entry_length = self.longest_entry_length.max(entry.len());
        self.entries.insert(entry.key.clone(), entry);
        true
    }

    /// Records `child` as formed from `parent` in the current round.
    pub fn add_child(&mut self, parent: &str, child: &str) {
        if let Some(entry) = self.entries.get_mut(parent) {
            if !entry.children.iter().any(|c| c == child) {
                entry.children.push(child.to_string());
            }
        }
    }

    pub fn clear_children(&mut self) {
        for entry in self.entries.values_mut() {
            entry.children.clear();
        }
    }

    pub fn reset_counts(&mut self) {
        for entry in self.entries.values_mut() {
            entry.count = 0;
        }
    }

    /// Attributes one more token to `key`. Unknown keys are ignored.
    pub fn increment(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.count += 1;
        }
    }

    /// Recomputes every frequency from the current counts.
    /// O(n) in the number of entries.
    pub fn recompute_frequencies(&mut self) {
        let counts: Vec<u64> = self.entries.values().map(|e| e.count).collect();
        if let Some(freqs) = cost::frequencies(&counts) {
            for (entry, freq) in self.entries.values_mut().zip(freqs) {
                entry.frequency = freq;
            }
        }
    }

    /// Moves zero-count multi-character entries to the rejected set and
    /// restores single characters to a count of 1. A rejected entry logs
    /// its final zero count at `iteration` on the way out.
    /// Returns the rejected keys in key order.
    pub fn filter_zero_counts(&mut self, iteration: u32) -> Vec<String> {
        let mut doomed = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if entry.count > 0 {
                continue;
            }
            if entry.is_single_char() {
                entry.count = 1;
            } else {
                doomed.push(key.clone());
            }
        }
        for key in &doomed {
            if let Some(mut entry) = self.entries.remove(key) {
                entry.update_register(iteration);
                self.rejected.insert(key.clone(), entry);
            }
        }
        doomed
    }

    /// Dictionary cost of the current entry set under the letter code.
    pub fn dictionary_cost(&self) -> f64 {
        cost::dictionary_cost(self.entries.keys().map(String::as_str), &self.letter_costs)
    }

    pub fn update_registers(&mut self, iteration: u32) {
        for entry in self.entries.values_mut() {
            entry.update_register(iteration);
        }
    }

    /// Total count over all entries.
    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }
}
