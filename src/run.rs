// File: src/run.rs
use crate::config::RunConfig;
use crate::core::corpus::Corpus;
use crate::core::engine::SegmentationEngine;
use crate::core::types::IterationRecord;
use crate::errors::{Result, WordbreakError};
use crate::persistence;
use crate::report::{self, RunLog};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where a run put its files.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub dir: PathBuf,
    pub log: PathBuf,
    pub broken_corpus: PathBuf,
    pub lexicon: PathBuf,
    pub recall_precision: PathBuf,
    pub checkpoint: PathBuf,
    pub config: PathBuf,
}

impl RunOutputs {
    fn for_config(config: &RunConfig) -> Self {
        let dir = config.run_dir();
        let label = format!("wb-{}", config.iteration_label());
        let file = |suffix: &str| dir.join(format!("{label}{suffix}"));
        Self {
            log: file(".txt"),
            broken_corpus: file("_brokencorpus.txt"),
            lexicon: file("_lexicon.txt"),
            recall_precision: file("_recallprecision.tsv"),
            checkpoint: file("_checkpoint.bin"),
            config: dir.join("run_config.json"),
            dir,
        }
    }
}

/// How a finished run ended up.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outputs: RunOutputs,
    /// Record of the final iteration reported.
    pub last: Option<IterationRecord>,
    pub entries: usize,
    pub rejected: usize,
    pub elapsed: Duration,
}

/// One invocation of the segmenter: fresh start or resume, iterate to
/// `itarget`, write every output and checkpoint the model.
pub struct SegmentationRun {
    config: RunConfig,
}

impl SegmentationRun {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<RunReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // Everything fatal is found here, before any output is written.
        let (mut engine, fresh) = match &cfg.checkpoint {
            Some(path) => {
                let state = persistence::load_checkpoint(path, cfg.ibase)?;
                (SegmentationEngine::from_state(state, cfg.engine_settings()), false)
            }
            None => {
                let path = cfg.corpus.as_deref().ok_or(WordbreakError::MissingCorpus)?;
                let corpus = Corpus::from_file(path, cfg.max_corpus_lines)?;
                (SegmentationEngine::new(corpus, cfg.engine_settings()), true)
            }
        };

        let outputs = RunOutputs::for_config(cfg);
        fs::create_dir_all(&outputs.dir)?;
        cfg.save(&outputs.dir)?;

        let mut log = RunLog::create(&outputs.log)?;
        log.header(cfg, &outputs.checkpoint)?;
        log.skipped_lines(&engine.state().corpus)?;
        if fresh {
            if let Some(startup) = engine.state().history.last() {
                log.startup(startup)?;
            }
        }

        let started = Instant::now();
        engine.run_until(cfg.itarget, |summary| Ok(log.iteration(summary)?))?;
        let elapsed = started.elapsed();
        log.finish(elapsed)?;
        tracing::info!("Elapsed wall time in seconds = {:.3}", elapsed.as_secs_f64());

        let state = engine.into_state();
        report::write_file(&outputs.broken_corpus, |out| {
            report::write_broken_corpus(out, &state.parsed_lines)
        })?;
        report::write_file(&outputs.lexicon, |out| report::write_lexicon(out, &state.lexicon))?;
        report::write_file(&outputs.recall_precision, |out| {
            report::write_recall_precision(out, &state.history)
        })?;
        persistence::save_checkpoint(&state, &outputs.checkpoint)?;

        Ok(RunReport {
            outputs,
            last: state.history.last().cloned(),
            entries: state.lexicon.len(),
            rejected: state.lexicon.rejected().count(),
            elapsed,
        })
    }
}
