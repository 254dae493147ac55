// src/core/types.rs
use serde::{Deserialize, Serialize};

/// One row of an entry's count history: the iteration it was recorded in,
/// the count at that moment and the children formed from the entry during
/// that iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRow {
    pub iteration: u32,
    pub count: u64,
    pub children: Vec<String>,
}

/// A reusable character sequence known to the lexicon.
/// This is the unit the segmenter emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub key: String,
    /// Tokens attributed to this entry in the current best parse.
    pub count: u64,
    /// `count` over the total count of all entries, as of the last
    /// recomputation.
    pub frequency: f64,
    /// The two entries whose concatenation produced this one.
    /// `None` for single characters seeded from the corpus.
    pub parents: Option<(String, String)>,
    /// Entries formed from this one during the current candidate round only.
    pub children: Vec<String>,
    /// Append-only delta log of `(iteration, count, children)`.
    pub register: Vec<RegisterRow>,
}

impl LexiconEntry {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
            frequency: 0.0,
            parents: None,
            children: Vec::new(),
            register: Vec::new(),
        }
    }

    /// Length of the key in characters.
    pub fn len(&self) -> usize {
        self.key.chars().count()
    }

    pub fn is_single_char(&self) -> bool {
        self.len() == 1
    }

    /// Appends a register row unless the count and children are the same as
    /// in the last recorded row.
    pub fn update_register(&mut self, iteration: u32) {
        let unchanged = self
            .register
            .last()
            .is_some_and(|last| last.count == self.count && last.children == self.children);
        if !unchanged {
            self.register.push(RegisterRow {
                iteration,
                count: self.count,
                children: self.children.clone(),
            });
        }
    }
}

/// A precision/recall pair for one metric at one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
}

impl PrecisionRecall {
    /// Builds a pair from true positives and the two denominators.
    /// A zero denominator yields 0 rather than NaN.
    pub fn from_counts(true_positives: u64, hypothesized: u64, actual: u64) -> Self {
        Self {
            precision: ratio(true_positives, hypothesized),
            recall: ratio(true_positives, actual),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// The scores of all three evaluation metrics for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub break_based: PrecisionRecall,
    pub token_based: PrecisionRecall,
    pub type_based: PrecisionRecall,
}

/// Everything recorded about one finished iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: u32,
    pub dictionary_cost: f64,
    pub corpus_cost: f64,
    pub evaluation: Evaluation,
}

impl IterationRecord {
    /// Total description length in bits.
    pub fn total_cost(&self) -> f64 {
        self.dictionary_cost + self.corpus_cost
    }
}
