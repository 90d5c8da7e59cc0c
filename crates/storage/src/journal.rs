// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL journal.
//!
//! Each entry is a single line of JSON:
//! `{"seq":N,"ts":"...","type":"EVENT_NAME",...}\n`
//!
//! JSON-Lines rather than a JSON array: appends are O(1) atomic writes for
//! lines up to PIPE_BUF, corruption is localized to one line, and tail/grep
//! keep working. Every append fsyncs before returning; the engine cannot
//! honour its invariants without durable events, so a failed write is fatal
//! to the run. Read failures during resume are equally fatal: the file is
//! an authoritative record and there is no heuristic recovery.

use delta_core::event::{Event, JournalEntry};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Journal file name within a run directory.
pub const JOURNAL_FILE: &str = "journal.jsonl";

/// Errors from journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("run directory does not exist: {0}")]
    MissingRunDir(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt journal entry at line {line}: {message}")]
    Corrupt { line: usize, message: String },
}

/// Writer/reader handle for one run's journal.
///
/// Single-writer per run: only the engine process that owns the run holds
/// an open `Journal`.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: File,
    /// Sequence number the next appended event will receive.
    next_seq: u64,
}

impl Journal {
    /// Open (or create) the journal inside an existing run directory.
    ///
    /// Scans any existing entries to continue the sequence; a corrupt line
    /// is an error, not something to skip past.
    pub fn open(run_dir: &Path) -> Result<Self, JournalError> {
        if !run_dir.is_dir() {
            return Err(JournalError::MissingRunDir(run_dir.to_path_buf()));
        }
        let path = run_dir.join(JOURNAL_FILE);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let entries = read_entries(&file, &path)?;
        let next_seq = entries.last().map(|e| e.seq).unwrap_or(0) + 1;

        Ok(Self { path, file, next_seq })
    }

    /// Sequence number the next appended event will receive.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Append one event and fsync.
    ///
    /// Assigns the next sequence number and a UTC ISO-8601 millisecond
    /// timestamp, then writes a single line. Returns the assigned seq.
    pub fn append(&mut self, event: &Event) -> Result<u64, JournalError> {
        let seq = self.next_seq;
        let entry = JournalEntry { seq, ts: now_iso_ms(), event: event.clone() };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        self.next_seq += 1;
        tracing::trace!(seq, kind = event.kind(), "journal append");
        Ok(seq)
    }

    /// Read and validate every entry, sorted by seq.
    pub fn read_all(&self) -> Result<Vec<JournalEntry>, JournalError> {
        read_entries(&self.file, &self.path)
    }

    /// Read a journal without holding a writer handle (listing, resume
    /// inspection).
    pub fn read_path(run_dir: &Path) -> Result<Vec<JournalEntry>, JournalError> {
        let path = run_dir.join(JOURNAL_FILE);
        let file = File::open(&path)?;
        read_entries(&file, &path)
    }
}

fn read_entries(file: &File, path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let mut reader = BufReader::new(file.try_clone()?);
    reader.seek(SeekFrom::Start(0))?;

    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let entry: JournalEntry =
            serde_json::from_str(trimmed).map_err(|e| JournalError::Corrupt {
                line: idx + 1,
                message: format!("{} ({})", e, path.display()),
            })?;
        entries.push(entry);
    }

    entries.sort_by_key(|e| e.seq);
    Ok(entries)
}

/// UTC now as ISO-8601 with millisecond precision (`2026-08-01T12:00:00.123Z`).
pub fn now_iso_ms() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
