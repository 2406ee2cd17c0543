//! Storage module for persisting the index
//!
//! This module handles writing the inverted index to disk when the process
//! shuts down and reading it back for query-only sessions. Snapshots are
//! pretty-printed JSON so they can be inspected by hand.

mod snapshot;

pub use snapshot::IndexSnapshot;

use crate::index::InvertedIndex;
use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index path is not writable: {0}")]
    NotWritable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Checks that an index snapshot can be written to `path`
///
/// Run at startup so an unusable target aborts before any crawling happens.
/// An existing file is left untouched; a probe file created by the check is
/// removed again.
pub fn ensure_writable(path: &Path) -> StorageResult<()> {
    if path.is_dir() {
        return Err(StorageError::NotWritable(format!(
            "{} is a directory",
            path.display()
        )));
    }

    let existed = path.exists();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::NotWritable(format!("{}: {}", path.display(), e)))?;

    if !existed {
        fs::remove_file(path)?;
    }

    Ok(())
}

/// Writes the index to `path` as a JSON snapshot
///
/// The snapshot is written to a sibling temporary file first and renamed into
/// place, so a reader never sees a half-written index.
///
/// # Returns
///
/// The snapshot metadata that was written (token count, timestamp)
pub fn save_index(
    index: &InvertedIndex,
    path: &Path,
    config_hash: Option<&str>,
) -> StorageResult<IndexSnapshot> {
    let snapshot = IndexSnapshot::capture(index, config_hash.map(str::to_string));
    let tmp_path = temp_path_for(path);

    {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    tracing::info!(
        "Saved index with {} tokens to {}",
        snapshot.token_count,
        path.display()
    );

    Ok(snapshot)
}

/// Reads a JSON snapshot from `path` and rebuilds the index
pub fn load_index(path: &Path) -> StorageResult<InvertedIndex> {
    let file = fs::File::open(path)?;
    let snapshot: IndexSnapshot = serde_json::from_reader(BufReader::new(file))?;

    tracing::info!(
        "Loaded index with {} tokens (saved at {})",
        snapshot.tokens.len(),
        snapshot.saved_at
    );

    Ok(snapshot.into_index())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "index.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
