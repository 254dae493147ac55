// File: src/core/parser.rs
use crate::core::cost::plog;
use crate::core::lexicon::Lexicon;
use crate::errors::{Result, WordbreakError};

/// The cheapest segmentation of one string under the current lexicon.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub tokens: Vec<String>,
    /// Sum of `plog(frequency)` over the tokens.
    pub bits: f64,
}

/// Bounded-window shortest-code segmenter over a borrowed lexicon.
///
/// The parser never mutates the lexicon; callers aggregate counts.
pub struct Parser<'a> {
    lexicon: &'a Lexicon,
    verbose: bool,
}

impl<'a> Parser<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon, verbose: false }
    }

    /// Emits one debug event per window position tried.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Finds the lowest-cost sequence of entries spelling `word`.
    ///
    /// Ties go to the smallest start index. O(n * w) where `n` is the word
    /// length and `w` the longest entry length.
    pub fn parse_word(&self, word: &str) -> Result<Parse> {
        // Byte offset of every character boundary, including the end.
        let bounds: Vec<usize> = word
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(word.len()))
            .collect();
        let n = bounds.len() - 1;
        let window = self.lexicon.longest_entry_length().max(1);

        let mut best = vec![0.0f64; n + 1];
        let mut back = vec![0usize; n + 1];

        for outer in 1..=n {
            let start = outer.saturating_sub(window);
            let mut chosen: Option<(usize, f64)> = None;
            for inner in start..outer {
                let piece = &word[bounds[inner]..bounds[outer]];
                let Some(entry) = self.lexicon.get(piece) else {
                    if self.verbose {
                        tracing::debug!(outer, inner, piece, found = false);
                    }
                    continue;
                };
                let candidate = best[inner] + plog(entry.frequency);
                if chosen.map_or(true, |(_, bits)| candidate < bits) {
                    chosen = Some((inner, candidate));
                }
                if self.verbose {
                    tracing::debug!(outer, inner, piece, found = true, bits = candidate);
                }
            }

            let (inner, bits) = chosen.ok_or_else(|| {
                let c = word[bounds[outer - 1]..].chars().next().unwrap_or_default();
                WordbreakError::UnknownCharacter(c)
            })?;
            best[outer] = bits;
            back[outer] = inner;
            if self.verbose {
                tracing::debug!(outer, chosen = &word[bounds[inner]..bounds[outer]], bits);
            }
        }

        let mut tokens = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = back[end];
            tokens.push(word[bounds[start]..bounds[end]].to_string());
            end = start;
        }
        tokens.reverse();

        Ok(Parse { tokens, bits: best[n] })
    }
}
