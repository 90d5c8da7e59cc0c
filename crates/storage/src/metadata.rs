// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic `metadata.json` persistence.
//!
//! The file is always replaced whole (temp file + rename) so readers never
//! observe a torn write. During the run only the owning engine process
//! writes it; after a crash only the janitor may correct a stale `RUNNING`
//! status.

use delta_core::run::RunMetadata;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metadata file name within a run directory.
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata not found for run directory {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid metadata.json at {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Current epoch milliseconds.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Load a run's metadata.
pub fn load_metadata(run_dir: &Path) -> Result<RunMetadata, MetadataError> {
    let path = run_dir.join(METADATA_FILE);
    let bytes = std::fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MetadataError::NotFound(run_dir.to_path_buf())
        } else {
            MetadataError::Io(e)
        }
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| MetadataError::Invalid { path, message: e.to_string() })
}

/// Persist metadata atomically, stamping `updated_at_ms`.
pub fn save_metadata(run_dir: &Path, metadata: &mut RunMetadata) -> Result<(), MetadataError> {
    metadata.updated_at_ms = now_ms();
    let path = run_dir.join(METADATA_FILE);
    let tmp_path = run_dir.join(".metadata.json.tmp");
    {
        let mut tmp = std::fs::File::create(&tmp_path)?;
        let mut bytes = serde_json::to_vec_pretty(metadata)
            .map_err(|e| MetadataError::Invalid { path: path.clone(), message: e.to_string() })?;
        bytes.push(b'\n');
        tmp.write_all(&bytes)?;
        tmp.sync_all()?;
    }
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// Load, mutate, and atomically re-save a run's metadata.
pub fn update_metadata(
    run_dir: &Path,
    mutate: impl FnOnce(&mut RunMetadata),
) -> Result<RunMetadata, MetadataError> {
    let mut metadata = load_metadata(run_dir)?;
    mutate(&mut metadata);
    save_metadata(run_dir, &mut metadata)?;
    Ok(metadata)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
