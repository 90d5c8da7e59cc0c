// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run status machine and persistent run metadata.

use crate::id::RunId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Status of a run.
///
/// Wire names match the journal/metadata format: `RUNNING`,
/// `WAITING_FOR_INPUT`, `INTERRUPTED`, `COMPLETED`, `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Engine process owns the run and is iterating
    Running,
    /// Paused for an async `ask_human` answer
    WaitingForInput,
    /// Stopped by signal or reclassified by the janitor
    Interrupted,
    /// Assistant returned no tool calls
    Completed,
    /// Fatal error or iteration budget exhausted
    Failed,
}

impl RunStatus {
    /// Whether this status is terminal (no further transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Whether `continue` may pick the run back up.
    pub fn is_resumable(&self) -> bool {
        matches!(self, RunStatus::WaitingForInput | RunStatus::Interrupted)
    }

    /// Process exit code for a run that ended in this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Failed => 1,
            RunStatus::WaitingForInput => 101,
            RunStatus::Interrupted => 130,
            RunStatus::Running => 0,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "RUNNING",
            RunStatus::WaitingForInput => "WAITING_FOR_INPUT",
            RunStatus::Interrupted => "INTERRUPTED",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RUNNING" => Ok(RunStatus::Running),
            "WAITING_FOR_INPUT" => Ok(RunStatus::WaitingForInput),
            "INTERRUPTED" => Ok(RunStatus::Interrupted),
            "COMPLETED" => Ok(RunStatus::Completed),
            "FAILED" => Ok(RunStatus::Failed),
            other => Err(format!("unknown run status: {}", other)),
        }
    }
}

/// Persistent state of one run (`metadata.json`).
///
/// Updated by the engine process during the run and, after a crash, only by
/// the janitor (which reclassifies stale `RUNNING` to `INTERRUPTED`). The
/// pid/hostname/process_name triple is what the janitor uses to decide
/// whether a `RUNNING` run is actually alive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: RunId,
    pub task: String,
    /// Path to the agent directory this run executes.
    pub agent_ref: PathBuf,
    pub status: RunStatus,
    pub pid: u32,
    pub hostname: String,
    pub process_name: String,
    /// Completed T-A-O iterations.
    #[serde(default)]
    pub iterations_completed: u32,
    /// Epoch milliseconds when the run was created.
    pub start_time_ms: u64,
    /// Epoch milliseconds of the last metadata write.
    pub updated_at_ms: u64,
    /// Terminal failure reason, mirrored from RUN_END for cheap listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunMetadata {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_resumable(&self) -> bool {
        self.status.is_resumable()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
