// File: src/learning.rs
use crate::core::lexicon::Lexicon;
use crate::core::types::{LexiconEntry, RegisterRow};
use std::collections::HashMap;

/// A proposed entry: two adjacent tokens of the current parse glued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    /// Occurrences of the concatenated string across the whole parse.
    pub count: u64,
    /// The first adjacent pair seen that produced the key.
    pub parents: (String, String),
}

impl Candidate {
    fn into_entry(self, iteration: u32) -> LexiconEntry {
        let mut entry = LexiconEntry::new(self.key, self.count);
        entry.register.push(RegisterRow {
            iteration,
            count: entry.count,
            children: Vec::new(),
        });
        entry.parents = Some(self.parents);
        entry
    }
}

/// Grows the lexicon from the most frequent adjacent token pairs.
pub struct CandidateGenerator {
    top_k: usize,
}

impl CandidateGenerator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Ranks every unseen pair concatenation by aggregate count and keeps the
    /// top `top_k`. A group tied at the cutoff is kept whole. Rejected keys
    /// never make the list.
    pub fn nominate(&self, parsed_lines: &[Vec<String>], lexicon: &Lexicon) -> Vec<Candidate> {
        let mut tally: HashMap<String, Candidate> = HashMap::new();
        for line in parsed_lines {
            for pair in line.windows(2) {
                let key = format!("{}{}", pair[0], pair[1]);
                if lexicon.contains(&key) || lexicon.is_rejected(&key) {
                    continue;
                }
                tally
                    .entry(key)
                    .or_insert_with_key(|key| Candidate {
                        key: key.clone(),
                        count: 0,
                        parents: (pair[0].clone(), pair[1].clone()),
                    })
                    .count += 1;
            }
        }

        let mut ranked: Vec<Candidate> = tally.into_values().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

        let mut cutoff = self.top_k.min(ranked.len());
        while cutoff > 0 && cutoff < ranked.len() && ranked[cutoff].count == ranked[cutoff - 1].count {
            cutoff += 1;
        }
        ranked.truncate(cutoff);
        ranked
    }

    /// Runs one candidate round: clears last round's children, admits the
    /// nominees with their nominated counts and records provenance.
    pub fn learn(
        &self,
        lexicon: &mut Lexicon,
        parsed_lines: &[Vec<String>],
        iteration: u32,
    ) -> Vec<Candidate> {
        lexicon.clear_children();
        let nominees = self.nominate(parsed_lines, lexicon);

        for nominee in &nominees {
            tracing::debug!(
                "Nominee {:>15} {:>10} {:>12} {:>12}",
                nominee.key,
                nominee.count,
                nominee.parents.0,
                nominee.parents.1
            );
            lexicon.insert(nominee.clone().into_entry(iteration));
            lexicon.add_child(&nominee.parents.0, &nominee.key);
            lexicon.add_child(&nominee.parents.1, &nominee.key);
        }
        nominees
    }
}
