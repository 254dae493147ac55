// File: src/core/corpus.rs
use crate::errors::{Result, WordbreakError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The unbroken training text together with the segmentation it came from.
///
/// The ground truth is only ever used for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// One string per usable input line, words concatenated.
    pub lines: Vec<String>,
    /// Per line, the character offsets at which true words end.
    pub boundaries: Vec<Vec<usize>>,
    /// True word -> occurrence count.
    pub true_word_counts: BTreeMap<String, u64>,
    pub true_running_words: u64,
    /// Input lines dropped because they held no words.
    pub skipped_lines: usize,
}

impl Corpus {
    /// Reads a whitespace-segmented corpus, keeping at most `max_lines` raw lines.
    pub fn from_file(path: &Path, max_lines: Option<usize>) -> Result<Self> {
        let unreadable = |source| WordbreakError::CorpusUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let mut raw = Vec::new();
        for line in BufReader::new(file).lines().take(max_lines.unwrap_or(usize::MAX)) {
            raw.push(line.map_err(unreadable)?);
        }
        tracing::info!("Read {} lines from '{}'", raw.len(), path.display());

        let corpus = Self::from_lines(raw.iter().map(String::as_str));
        if corpus.lines.is_empty() {
            return Err(WordbreakError::EmptyCorpus(path.to_path_buf()));
        }
        Ok(corpus)
    }

    /// Builds a corpus from already-loaded lines.
    pub fn from_lines<'a, I>(raw_lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut corpus = Self::default();
        for raw in raw_lines {
            let words = split_true_words(raw);
            if words.is_empty() {
                corpus.skipped_lines += 1;
                continue;
            }

            let mut line = String::new();
            let mut offsets = Vec::with_capacity(words.len());
            let mut offset = 0;
            for word in words {
                offset += word.chars().count();
                offsets.push(offset);
                line.push_str(word);
                *corpus.true_word_counts.entry(word.to_string()).or_insert(0) += 1;
                corpus.true_running_words += 1;
            }
            corpus.lines.push(line);
            corpus.boundaries.push(offsets);
        }
        if corpus.skipped_lines > 0 {
            tracing::warn!("Skipped {} empty corpus lines", corpus.skipped_lines);
        }
        tracing::info!(
            "{} distinct words, {} running words in the original corpus",
            corpus.true_word_counts.len(),
            corpus.true_running_words
        );
        corpus
    }

    /// Lines with fewer than two true words, which break-based scoring
    /// cannot use.
    pub fn single_word_lines(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .zip(&self.boundaries)
            .enumerate()
            .filter(|(_, (_, truth))| truth.len() < 2)
            .map(|(line_no, (line, _))| (line_no, line.as_str()))
    }

    /// Occurrence count of every character in the unbroken text.
    pub fn char_counts(&self) -> BTreeMap<char, u64> {
        let mut counts = BTreeMap::new();
        for c in self.lines.iter().flat_map(|line| line.chars()) {
            *counts.entry(c).or_insert(0) += 1;
        }
        counts
    }
}

/// Splits a raw line into true words, detaching `.` and `?` from the word
/// they follow.
fn split_true_words(raw: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for token in raw.split_whitespace() {
        let mut rest = token;
        while let Some(pos) = rest.find(|c: char| c == '.' || c == '?') {
            if pos > 0 {
                words.push(&rest[..pos]);
            }
            words.push(&rest[pos..pos + 1]);
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            words.push(rest);
        }
    }
    words
}
