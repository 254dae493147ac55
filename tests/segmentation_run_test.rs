//! End-to-end runs through the public API: outputs, checkpoints, resuming.

use std::fs;
use std::path::{Path, PathBuf};
use wordbreak_core::{persistence, RunConfig, SegmentationRun, WordbreakError};

const CORPUS: &str = "\
the cat sat on the mat.
the dog sat on the log.
did the cat see the dog?
the dog saw the cat.

a cat and a dog sat.
";

fn write_corpus(dir: &Path) -> PathBuf {
    let path = dir.join("corpus.txt");
    fs::write(&path, CORPUS).unwrap();
    path
}

fn config(dir: &Path, ibase: u32, itarget: u32) -> RunConfig {
    RunConfig {
        corpus: Some(write_corpus(dir)),
        output_dir: dir.join("out"),
        ibase,
        itarget,
        checkpoint: None,
        candidates_per_iteration: 4,
        max_corpus_lines: None,
        verbose: false,
    }
}

#[test]
fn fresh_run_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = SegmentationRun::new(config(dir.path(), 0, 3)).execute().unwrap();

    let outputs = &report.outputs;
    assert!(outputs.dir.ends_with("wb-[1,3]"));
    for path in [
        &outputs.log,
        &outputs.broken_corpus,
        &outputs.lexicon,
        &outputs.recall_precision,
        &outputs.checkpoint,
        &outputs.config,
    ] {
        assert!(path.exists(), "missing {}", path.display());
    }

    // Five usable lines; the blank one is skipped.
    let broken = fs::read_to_string(&outputs.broken_corpus).unwrap();
    assert_eq!(broken.lines().count(), 5);
    for (line, raw) in broken.lines().zip(CORPUS.lines().filter(|l| !l.is_empty())) {
        let joined: String = line.split(' ').collect();
        let unbroken: String = raw.split_whitespace().collect();
        assert_eq!(joined, unbroken);
    }

    // Startup plus three iterations.
    let table = fs::read_to_string(&outputs.recall_precision).unwrap();
    assert_eq!(table.lines().count(), 5);

    let log = fs::read_to_string(&outputs.log).unwrap();
    assert!(log.contains("Startup"));
    assert!(log.contains("Iteration number 3"));

    let header = persistence::read_header(&outputs.checkpoint).unwrap();
    assert_eq!(header.last_iteration, 3);
    assert_eq!(report.last.as_ref().map(|r| r.iteration), Some(3));
}

#[test]
fn split_run_matches_single_run() {
    let whole_dir = tempfile::tempdir().unwrap();
    let whole = SegmentationRun::new(config(whole_dir.path(), 0, 4)).execute().unwrap();

    let split_dir = tempfile::tempdir().unwrap();
    let first = SegmentationRun::new(config(split_dir.path(), 0, 2)).execute().unwrap();
    let resumed = RunConfig {
        checkpoint: Some(first.outputs.checkpoint.clone()),
        corpus: None,
        ..config(split_dir.path(), 2, 4)
    };
    let second = SegmentationRun::new(resumed).execute().unwrap();

    let whole_state = persistence::load_checkpoint(&whole.outputs.checkpoint, 4).unwrap();
    let split_state = persistence::load_checkpoint(&second.outputs.checkpoint, 4).unwrap();
    assert_eq!(whole_state, split_state);
    assert_eq!(split_state.history.len(), 5);
}

#[test]
fn resume_with_wrong_ibase_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let first = SegmentationRun::new(config(dir.path(), 0, 1)).execute().unwrap();

    let resumed = RunConfig {
        checkpoint: Some(first.outputs.checkpoint.clone()),
        ..config(dir.path(), 2, 3)
    };
    let run_dir = resumed.run_dir();
    let err = SegmentationRun::new(resumed).execute().unwrap_err();
    assert!(matches!(
        err,
        WordbreakError::CheckpointMismatch { recorded: 1, requested: 2, .. }
    ));
    assert!(!run_dir.exists());
}

#[test]
fn configuration_errors_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let err = SegmentationRun::new(config(dir.path(), 2, 2)).execute().unwrap_err();
    assert!(matches!(err, WordbreakError::InvalidIterationRange { .. }));

    let err = SegmentationRun::new(config(dir.path(), 1, 2)).execute().unwrap_err();
    assert!(matches!(err, WordbreakError::MissingCheckpoint(1)));

    let missing = RunConfig {
        corpus: Some(dir.path().join("nope.txt")),
        ..config(dir.path(), 0, 1)
    };
    let err = SegmentationRun::new(missing).execute().unwrap_err();
    assert!(matches!(err, WordbreakError::CorpusUnreadable { .. }));
}

#[test]
fn line_cap_limits_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let capped = RunConfig {
        max_corpus_lines: Some(2),
        ..config(dir.path(), 0, 1)
    };
    let report = SegmentationRun::new(capped).execute().unwrap();
    let broken = fs::read_to_string(&report.outputs.broken_corpus).unwrap();
    assert_eq!(broken.lines().count(), 2);
}
