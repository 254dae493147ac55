use crate::core::corpus::Corpus;
use crate::core::cost::plog;
use crate::core::lexicon::Lexicon;
use crate::core::parser::Parser;
use crate::core::types::IterationRecord;
use crate::errors::Result;
use crate::evaluation;
use crate::learning::{Candidate, CandidateGenerator};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANDIDATES_PER_ITERATION: usize = 25;

/// Everything a run learns, and everything a checkpoint has to carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub lexicon: Lexicon,
    pub corpus: Corpus,
    /// Current best segmentation, one token list per corpus line.
    pub parsed_lines: Vec<Vec<String>>,
    pub dictionary_cost: f64,
    pub corpus_cost: f64,
    pub history: Vec<IterationRecord>,
    /// Last iteration started. Equals the last one finished between steps.
    pub iteration: u32,
}

/// Knobs that shape the learning, as opposed to where files go.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub candidates_per_iteration: usize,
    /// Trace every parser window position.
    pub verbose: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            candidates_per_iteration: DEFAULT_CANDIDATES_PER_ITERATION,
            verbose: false,
        }
    }
}

/// What one EXTEND -> PARSE -> REPORT cycle did.
#[derive(Debug, Clone)]
pub struct IterationSummary {
    pub record: IterationRecord,
    pub admitted: Vec<Candidate>,
    pub rejected: Vec<String>,
}

/// The self-training loop. Owns the model exclusively; each call to
/// [`SegmentationEngine::step`] runs one whole iteration.
pub struct SegmentationEngine {
    state: ModelState,
    generator: CandidateGenerator,
    verbose: bool,
}

impl SegmentationEngine {
    /// INIT: seeds single characters, takes the all-character parse as the
    /// starting point and reports it as iteration 0.
    pub fn new(corpus: Corpus, settings: EngineSettings) -> Self {
        let lexicon = Lexicon::from_char_counts(&corpus.char_counts());
        let parsed_lines: Vec<Vec<String>> = corpus
            .lines
            .iter()
            .map(|line| line.chars().map(String::from).collect())
            .collect();
        let corpus_cost: f64 = lexicon
            .entries()
            .map(|entry| entry.count as f64 * plog(entry.frequency))
            .sum();
        let dictionary_cost = lexicon.dictionary_cost();

        let mut engine = Self::from_state(
            ModelState {
                lexicon,
                corpus,
                parsed_lines,
                dictionary_cost,
                corpus_cost,
                history: Vec::new(),
                iteration: 0,
            },
            settings,
        );
        engine.report();
        engine
    }

    /// Picks up a restored model where it left off.
    pub fn from_state(state: ModelState, settings: EngineSettings) -> Self {
        Self {
            state,
            generator: CandidateGenerator::new(settings.candidates_per_iteration),
            verbose: settings.verbose,
        }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn into_state(self) -> ModelState {
        self.state
    }

    pub fn iteration(&self) -> u32 {
        self.state.iteration
    }

    /// EXTEND: admits a new round of candidates and re-prices the model.
    pub fn extend(&mut self) -> Vec<Candidate> {
        self.state.iteration += 1;
        let state = &mut self.state;
        let admitted = self
            .generator
            .learn(&mut state.lexicon, &state.parsed_lines, state.iteration);
        state.lexicon.recompute_frequencies();
        state.dictionary_cost = state.lexicon.dictionary_cost();
        admitted
    }

    /// PARSE: re-segments every line, recounts entries and rejects the
    /// multi-character entries no parse used. Returns the rejected keys.
    ///
    /// The whole corpus is parsed before any count is touched, so a failure
    /// leaves the model as it was.
    pub fn parse(&mut self) -> Result<Vec<String>> {
        let state = &mut self.state;
        let parser = Parser::new(&state.lexicon).verbose(self.verbose);
        let mut parsed_lines = Vec::with_capacity(state.corpus.lines.len());
        let mut corpus_cost = 0.0;
        for line in &state.corpus.lines {
            let parse = parser.parse_word(line)?;
            corpus_cost += parse.bits;
            parsed_lines.push(parse.tokens);
        }

        state.lexicon.reset_counts();
        for token in parsed_lines.iter().flatten() {
            state.lexicon.increment(token);
        }
        state.parsed_lines = parsed_lines;
        state.corpus_cost = corpus_cost;

        let rejected = state.lexicon.filter_zero_counts(state.iteration);
        for key in &rejected {
            tracing::debug!("---> Deleted {}", key);
        }
        Ok(rejected)
    }

    /// REPORT: appends costs and scores to the history and updates every
    /// entry's count register.
    pub fn report(&mut self) -> IterationRecord {
        let state = &mut self.state;
        let record = IterationRecord {
            iteration: state.iteration,
            dictionary_cost: state.dictionary_cost,
            corpus_cost: state.corpus_cost,
            evaluation: evaluation::evaluate(&state.corpus, &state.parsed_lines, &state.lexicon),
        };
        state.history.push(record.clone());
        state.lexicon.update_registers(state.iteration);

        tracing::info!(
            iteration = record.iteration,
            corpus = record.corpus_cost,
            dictionary = record.dictionary_cost,
            combined = record.total_cost(),
            "Cost"
        );
        let eval = &record.evaluation;
        for (label, pr) in [
            ("Break based", eval.break_based),
            ("Token based", eval.token_based),
            ("Type based", eval.type_based),
        ] {
            tracing::info!("{:>12} word precision {:6.4} recall {:6.4}", label, pr.precision, pr.recall);
        }
        record
    }

    /// Runs one full iteration.
    pub fn step(&mut self) -> Result<IterationSummary> {
        let admitted = self.extend();
        let rejected = self.parse()?;
        let record = self.report();
        Ok(IterationSummary {
            record,
            admitted,
            rejected,
        })
    }

    /// Steps until `itarget` has been reported, handing each summary to
    /// `on_iteration` as it finishes.
    pub fn run_until<F>(&mut self, itarget: u32, mut on_iteration: F) -> Result<()>
    where
        F: FnMut(&IterationSummary) -> Result<()>,
    {
        let ibase = self.state.iteration;
        while self.state.iteration < itarget {
            tracing::info!(
                "Iteration number {} (#{} of {} for this run)",
                self.state.iteration + 1,
                self.state.iteration + 1 - ibase,
                itarget - ibase
            );
            let summary = self.step()?;
            on_iteration(&summary)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(lines: &[&str], top_k: usize) -> SegmentationEngine {
        let settings = EngineSettings {
            candidates_per_iteration: top_k,
            verbose: false,
        };
        SegmentationEngine::new(Corpus::from_lines(lines.iter().copied()), settings)
    }

    fn tokens(line: &[&str]) -> Vec<String> {
        line.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn init_parses_character_by_character() {
        let engine = engine(&["the cat", "the dog"], 1);
        let state = engine.state();
        assert_eq!(state.parsed_lines[0], tokens(&["t", "h", "e", "c", "a", "t"]));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].iteration, 0);

        let letters = state.lexicon.letter_costs();
        let expected: f64 = "thecatthedog".chars().map(|c| letters[&c]).sum();
        assert!((state.corpus_cost - expected).abs() < 1e-9);
        for entry in state.lexicon.entries() {
            assert_eq!(entry.register[0].iteration, 0);
        }
    }

    #[test]
    fn learns_the_shared_prefix() {
        let mut engine = engine(&["the cat", "the dog"], 1);
        let baseline = engine.state().corpus_cost;

        let first = engine.step().unwrap();
        let keys: Vec<&str> = first.admitted.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["he", "th"]);
        assert_eq!(first.rejected, vec!["th".to_string()]);
        assert_eq!(engine.state().parsed_lines[0], tokens(&["t", "he", "c", "a", "t"]));

        let second = engine.step().unwrap();
        assert_eq!(second.admitted[0].key, "the");
        let state = engine.state();
        assert_eq!(state.parsed_lines[0], tokens(&["the", "c", "a", "t"]));
        assert_eq!(state.parsed_lines[1], tokens(&["the", "d", "o", "g"]));
        assert!(state.corpus_cost < baseline);
        assert!(state.lexicon.is_rejected("he"));
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn letters_survive_every_iteration() {
        let mut engine = engine(&["the cat sat", "the dog sat", "a cat"], 3);
        let letters: Vec<char> = engine.state().corpus.char_counts().into_keys().collect();
        for _ in 0..4 {
            engine.step().unwrap();
            for c in &letters {
                let entry = engine.state().lexicon.get(&c.to_string()).unwrap();
                assert!(entry.count >= 1);
            }
        }
    }

    #[test]
    fn frequencies_sum_to_one_after_extend() {
        let mut engine = engine(&["the cat sat", "the dog sat"], 2);
        engine.step().unwrap();
        engine.extend();
        let sum: f64 = engine.state().lexicon.entries().map(|e| e.frequency).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reparse_is_idempotent() {
        let mut engine = engine(&["the cat sat", "the dog sat", "a dog"], 3);
        engine.step().unwrap();
        engine.extend();
        engine.parse().unwrap();
        let first = engine.state().clone();
        engine.parse().unwrap();
        let second = engine.state();
        assert_eq!(first.parsed_lines, second.parsed_lines);
        assert_eq!(first.corpus_cost, second.corpus_cost);
        let counts = |s: &ModelState| s.lexicon.entries().map(|e| (e.key.clone(), e.count)).collect::<Vec<_>>();
        assert_eq!(counts(&first), counts(second));
    }

    #[test]
    fn rejected_entry_register_ends_at_zero() {
        let mut engine = engine(&["the cat", "the dog"], 1);
        engine.step().unwrap();
        let th = engine.state().lexicon.rejected().find(|e| e.key == "th").unwrap();
        let last = th.register.last().unwrap();
        assert_eq!((last.iteration, last.count), (1, 0));
        assert_eq!(th.register[0].count, 2);
    }

    #[test]
    fn rejected_keys_never_return() {
        // "abab" loses to ab|ab at iteration 2, but that pair stays adjacent
        // in every later parse.
        let mut engine = engine(&["ab ab", "ab ba"], 2);
        engine.step().unwrap();
        let second = engine.step().unwrap();
        assert!(second.rejected.contains(&"abab".to_string()));
        for _ in 0..3 {
            assert_eq!(engine.state().parsed_lines[0], tokens(&["ab", "ab"]));
            let summary = engine.step().unwrap();
            assert!(summary.admitted.iter().all(|c| c.key != "abab"));
            assert!(!engine.state().lexicon.contains("abab"));
            assert!(engine.state().lexicon.is_rejected("abab"));
        }
    }

    #[test]
    fn run_until_stops_at_target() {
        let mut engine = engine(&["ab ab", "ab ba"], 2);
        let mut seen = Vec::new();
        engine
            .run_until(3, |summary| {
                seen.push(summary.record.iteration);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(engine.iteration(), 3);
    }
}
