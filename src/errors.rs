// File: src/errors.rs
//! Error types for the segmentation engine.

use std::path::PathBuf;

/// Result type used throughout the crate.
pub type Result<T, E = WordbreakError> = std::result::Result<T, E>;

/// Everything that can stop a run.
///
/// All configuration problems are detected before any model computation.
/// Zero-count entries after a reparse are policy, not failure, and never
/// show up here.
#[derive(Debug, thiserror::Error)]
pub enum WordbreakError {
    #[error("itarget ({itarget}) must be greater than ibase ({ibase})")]
    InvalidIterationRange { ibase: u32, itarget: u32 },

    #[error("resuming after iteration {0} requires a checkpoint file")]
    MissingCheckpoint(u32),

    #[error("a fresh run requires a corpus file")]
    MissingCorpus,

    #[error("checkpoint '{}' records last iteration {recorded}, but ibase is {requested}", .path.display())]
    CheckpointMismatch {
        path: PathBuf,
        recorded: u32,
        requested: u32,
    },

    #[error("'{}' is not a usable checkpoint: {reason}", .path.display())]
    InvalidCheckpoint { path: PathBuf, reason: String },

    #[error("checkpoint format version {found} is not supported (expected {expected})")]
    UnsupportedCheckpointVersion { found: u32, expected: u32 },

    #[error("cannot read corpus '{}': {source}", .path.display())]
    CorpusUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus '{}' contains no usable lines", .0.display())]
    EmptyCorpus(PathBuf),

    /// Raised by the parser when a character has no lexicon entry.
    #[error("character {0:?} has no lexicon entry")]
    UnknownCharacter(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}
