// File: src/config.rs
use crate::core::engine::{EngineSettings, DEFAULT_CANDIDATES_PER_ITERATION};
use crate::errors::{Result, WordbreakError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// All settings for one run. Serialisable so the effective configuration
/// can be kept next to the outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Segmented text to learn from. Only read on a fresh start; a
    /// checkpoint carries its own corpus.
    pub corpus: Option<PathBuf>,
    /// Each run writes into its own `wb-[first,last]` folder under here.
    pub output_dir: PathBuf,
    /// Processing starts at iteration `ibase + 1`; 0 is a fresh start.
    pub ibase: u32,
    /// Last iteration performed by this run.
    pub itarget: u32,
    /// Saved state to resume from. Required when `ibase > 0`.
    pub checkpoint: Option<PathBuf>,
    pub candidates_per_iteration: usize,
    /// Cap on raw corpus lines read. `None` reads everything.
    pub max_corpus_lines: Option<usize>,
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            corpus: Some(PathBuf::from("corpus.txt")),
            output_dir: PathBuf::from("wordbreaking"),
            ibase: 0,
            itarget: 1,
            checkpoint: None,
            candidates_per_iteration: DEFAULT_CANDIDATES_PER_ITERATION,
            max_corpus_lines: None,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Rejects configurations that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.itarget <= self.ibase {
            return Err(WordbreakError::InvalidIterationRange {
                ibase: self.ibase,
                itarget: self.itarget,
            });
        }
        if self.ibase > 0 && self.checkpoint.is_none() {
            return Err(WordbreakError::MissingCheckpoint(self.ibase));
        }
        if self.checkpoint.is_none() && self.corpus.is_none() {
            return Err(WordbreakError::MissingCorpus);
        }
        Ok(())
    }

    /// `[first,last]` iteration label used in output names.
    pub fn iteration_label(&self) -> String {
        format!("[{},{}]", self.ibase + 1, self.itarget)
    }

    /// Folder receiving this run's outputs.
    pub fn run_dir(&self) -> PathBuf {
        self.output_dir.join(format!("wb-{}", self.iteration_label()))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            candidates_per_iteration: self.candidates_per_iteration,
            verbose: self.verbose,
        }
    }

    /// Writes the configuration as pretty JSON into `dir`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("run_config.json");
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_iteration_range() {
        let config = RunConfig { ibase: 3, itarget: 3, ..RunConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(WordbreakError::InvalidIterationRange { ibase: 3, itarget: 3 })
        ));
    }

    #[test]
    fn resume_needs_a_checkpoint() {
        let config = RunConfig { ibase: 2, itarget: 5, ..RunConfig::default() };
        assert!(matches!(config.validate(), Err(WordbreakError::MissingCheckpoint(2))));

        let config = RunConfig { checkpoint: Some("state.bin".into()), corpus: None, ..config };
        assert!(config.validate().is_ok());
        assert_eq!(config.run_dir(), PathBuf::from("wordbreaking/wb-[3,5]"));
    }

    #[test]
    fn fresh_start_needs_a_corpus() {
        let config = RunConfig { corpus: None, ..RunConfig::default() };
        assert!(matches!(config.validate(), Err(WordbreakError::MissingCorpus)));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig { max_corpus_lines: Some(100), ..RunConfig::default() };
        let path = config.save(dir.path()).unwrap();
        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }
}
