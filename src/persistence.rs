// File: src/persistence.rs
//! Versioned checkpoints.
//!
//! Layout: a fixed 16-byte bincode header (magic, format version, last
//! iteration) followed by the bincode-encoded [`ModelState`]. The header is
//! checked before the body is decoded.

use crate::core::engine::ModelState;
use crate::errors::{Result, WordbreakError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const MAGIC: [u8; 8] = *b"WBRKCKPT";
pub const FORMAT_VERSION: u32 = 1;

/// The iteration marker and format tag at the front of every checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHeader {
    magic: [u8; 8],
    pub format_version: u32,
    pub last_iteration: u32,
}

impl CheckpointHeader {
    fn new(last_iteration: u32) -> Self {
        Self {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            last_iteration,
        }
    }
}

/// Writes the whole model atomically: a temp file in the target directory
/// is filled and then renamed over `path`.
pub fn save_checkpoint(state: &ModelState, path: &Path) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, &CheckpointHeader::new(state.iteration))?;
        bincode::serialize_into(&mut writer, state)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    tracing::info!(
        "Saved checkpoint for iteration {} to '{}'",
        state.iteration,
        path.display()
    );
    Ok(())
}

/// Reads and validates only the header.
pub fn read_header(path: &Path) -> Result<CheckpointHeader> {
    let mut reader = open(path)?;
    decode_header(path, &mut reader)
}

/// Restores a model, insisting that the checkpoint ends exactly at `ibase`.
pub fn load_checkpoint(path: &Path, ibase: u32) -> Result<ModelState> {
    let mut reader = open(path)?;
    let header = decode_header(path, &mut reader)?;
    if header.last_iteration != ibase {
        return Err(WordbreakError::CheckpointMismatch {
            path: path.to_path_buf(),
            recorded: header.last_iteration,
            requested: ibase,
        });
    }

    tracing::info!("Loading saved state from '{}'", path.display());
    let state: ModelState =
        bincode::deserialize_from(&mut reader).map_err(|e| invalid(path, e.to_string()))?;
    if state.iteration != header.last_iteration {
        return Err(invalid(
            path,
            format!(
                "header marks iteration {} but the body holds iteration {}",
                header.last_iteration, state.iteration
            ),
        ));
    }
    Ok(state)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| invalid(path, e.to_string()))
}

fn decode_header<R: Read>(path: &Path, reader: &mut R) -> Result<CheckpointHeader> {
    let header: CheckpointHeader =
        bincode::deserialize_from(reader).map_err(|_| invalid(path, "truncated header".into()))?;
    if header.magic != MAGIC {
        return Err(invalid(path, "missing checkpoint signature".into()));
    }
    if header.format_version != FORMAT_VERSION {
        return Err(WordbreakError::UnsupportedCheckpointVersion {
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(header)
}

fn invalid(path: &Path, reason: String) -> WordbreakError {
    WordbreakError::InvalidCheckpoint {
        path: path.to_path_buf(),
        reason,
    }
}
