// File: src/evaluation.rs
//! Scores a segmentation against the corpus ground truth.
//!
//! None of these numbers feed back into the model.

use crate::core::corpus::Corpus;
use crate::core::lexicon::Lexicon;
use crate::core::types::{Evaluation, PrecisionRecall};
use std::collections::HashSet;

/// Runs all three metrics.
pub fn evaluate(corpus: &Corpus, parsed_lines: &[Vec<String>], lexicon: &Lexicon) -> Evaluation {
    let hypothesized = hypothesized_running_words(parsed_lines);
    Evaluation {
        break_based: break_based(corpus, parsed_lines, hypothesized),
        token_based: token_based(corpus, lexicon, hypothesized),
        type_based: type_based(corpus, lexicon),
    }
}

pub fn hypothesized_running_words(parsed_lines: &[Vec<String>]) -> u64 {
    parsed_lines.iter().map(|line| line.len() as u64).sum()
}

/// Compares implied boundary offsets line by line.
/// Lines with fewer than two true boundaries are skipped.
pub fn break_based(corpus: &Corpus, parsed_lines: &[Vec<String>], hypothesized: u64) -> PrecisionRecall {
    let mut true_positives = 0u64;
    for (line_no, (truth, parse)) in corpus.boundaries.iter().zip(parsed_lines).enumerate() {
        if truth.len() < 2 {
            tracing::debug!("Skipping this line: {} {}", line_no, corpus.lines[line_no]);
            continue;
        }
        let truth: HashSet<usize> = truth.iter().copied().collect();
        let mut offset = 0;
        for token in parse {
            offset += token.chars().count();
            if truth.contains(&offset) {
                true_positives += 1;
            }
        }
    }
    PrecisionRecall::from_counts(true_positives, hypothesized, corpus.true_running_words)
}

/// Bounded matching of entry counts against true word counts.
pub fn token_based(corpus: &Corpus, lexicon: &Lexicon, hypothesized: u64) -> PrecisionRecall {
    let true_positives: u64 = lexicon
        .entries()
        .filter_map(|entry| {
            corpus
                .true_word_counts
                .get(&entry.key)
                .map(|&true_count| true_count.min(entry.count))
        })
        .sum();
    PrecisionRecall::from_counts(true_positives, hypothesized, corpus.true_running_words)
}

/// Distinct entries that are true words, without frequency weighting.
pub fn type_based(corpus: &Corpus, lexicon: &Lexicon) -> PrecisionRecall {
    let matches = lexicon
        .entries()
        .filter(|entry| corpus.true_word_counts.contains_key(&entry.key))
        .count() as u64;
    PrecisionRecall::from_counts(
        matches,
        lexicon.len() as u64,
        corpus.true_word_counts.len() as u64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LexiconEntry;

    fn tokens(line: &[&str]) -> Vec<String> {
        line.iter().map(|t| t.to_string()).collect()
    }

    fn setup() -> (Corpus, Lexicon, Vec<Vec<String>>) {
        let corpus = Corpus::from_lines(["the cat", "the dog"]);
        let mut lexicon = Lexicon::from_char_counts(&corpus.char_counts());
        lexicon.insert(LexiconEntry::new("the", 0));
        let parsed = vec![tokens(&["the", "c", "a", "t"]), tokens(&["the", "d", "o", "g"])];
        lexicon.reset_counts();
        for token in parsed.iter().flatten() {
            lexicon.increment(token);
        }
        (corpus, lexicon, parsed)
    }

    #[test]
    fn break_based_counts_shared_offsets() {
        let (corpus, _, parsed) = setup();
        let pr = break_based(&corpus, &parsed, hypothesized_running_words(&parsed));
        assert!((pr.precision - 0.5).abs() < 1e-12);
        assert!((pr.recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn token_based_uses_bounded_matching() {
        let (corpus, lexicon, parsed) = setup();
        let pr = token_based(&corpus, &lexicon, hypothesized_running_words(&parsed));
        assert!((pr.precision - 0.25).abs() < 1e-12);
        assert!((pr.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn type_based_counts_distinct_words() {
        let (corpus, lexicon, _) = setup();
        let pr = type_based(&corpus, &lexicon);
        assert!((pr.recall - 1.0 / 3.0).abs() < 1e-12);
        assert!((pr.precision - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn single_word_lines_are_left_out_of_break_scores() {
        let corpus = Corpus::from_lines(["hello", "a b"]);
        let parsed = vec![tokens(&["hello"]), tokens(&["a", "b"])];
        let pr = break_based(&corpus, &parsed, 3);
        // Only "a b" is scored: both of its boundaries are found.
        assert!((pr.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((pr.recall - 2.0 / 3.0).abs() < 1e-12);
    }
}
