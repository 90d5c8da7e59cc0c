// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path helpers for the inside of one run directory.
//!
//! ```text
//! <run-dir>/
//!   journal.jsonl
//!   metadata.json
//!   io/
//!     invocations/{NNN}/
//!     tool_executions/{NNN}_{tool}/
//!   runtime_io/hooks/{NNN}_{hook}/
//!   interaction/            # present only while WAITING_FOR_INPUT
//! ```

use std::path::{Path, PathBuf};

/// Path arithmetic for one run directory.
#[derive(Debug, Clone)]
pub struct RunPaths {
    run_dir: PathBuf,
}

impl RunPaths {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        Self { run_dir: run_dir.into() }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn io_dir(&self) -> PathBuf {
        self.run_dir.join("io")
    }

    pub fn invocations_dir(&self) -> PathBuf {
        self.io_dir().join("invocations")
    }

    /// `io/invocations/{NNN}` for the given 1-based iteration.
    pub fn invocation_dir(&self, iteration: u32) -> PathBuf {
        self.invocations_dir().join(format!("{:03}", iteration))
    }

    pub fn tool_executions_dir(&self) -> PathBuf {
        self.io_dir().join("tool_executions")
    }

    /// `io/tool_executions/{NNN}_{tool}`, keyed by the journal seq the
    /// ACTION_RESULT will receive.
    pub fn tool_execution_dir(&self, seq: u64, tool: &str) -> PathBuf {
        self.tool_executions_dir().join(format!("{:03}_{}", seq, tool))
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.run_dir.join("runtime_io").join("hooks")
    }

    /// `runtime_io/hooks/{NNN}_{hook}` for the given invocation ordinal.
    pub fn hook_dir(&self, ordinal: u32, hook: &str) -> PathBuf {
        self.hooks_dir().join(format!("{:03}_{}", ordinal, hook))
    }

    /// Next hook invocation ordinal: one past the highest existing `NNN_`.
    pub fn next_hook_ordinal(&self) -> u32 {
        max_numbered_entry(&self.hooks_dir()) + 1
    }

    pub fn interaction_dir(&self) -> PathBuf {
        self.run_dir.join("interaction")
    }

    pub fn interaction_request(&self) -> PathBuf {
        self.interaction_dir().join("request.json")
    }

    pub fn interaction_response(&self) -> PathBuf {
        self.interaction_dir().join("response.txt")
    }
}

/// Highest `NNN` prefix among a directory's entries, or 0.
fn max_numbered_entry(dir: &Path) -> u32 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.split('_').next().and_then(|n| n.parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
