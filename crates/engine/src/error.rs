// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type.
//!
//! Everything here is fatal to the current invocation: either a start-up
//! consistency error (nothing was mutated yet) or a loss of durable state
//! mid-run (the engine cannot honour its invariants without the journal).
//! Recoverable trouble (bad tool arguments, failing hooks, non-zero tool
//! exits) never surfaces as this type; it becomes observations and audit
//! events instead.

use delta_core::id::RunId;
use delta_core::run::RunStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Agent(#[from] delta_agent::AgentError),

    #[error(transparent)]
    Workspace(#[from] delta_storage::WorkspaceError),

    #[error(transparent)]
    Journal(#[from] delta_storage::JournalError),

    #[error(transparent)]
    Metadata(#[from] delta_storage::MetadataError),

    #[error("run '{run_id}' is {status} and cannot be resumed")]
    NotResumable { run_id: RunId, status: RunStatus },

    #[error(
        "run '{run_id}' is waiting for input; write the answer to \
         {response_path} and run continue again"
    )]
    AwaitingResponse { run_id: RunId, response_path: std::path::PathBuf },

    #[error(
        "run '{run_id}' was started on host '{hostname}' and may still be \
         running there; pass --force to clean it up anyway"
    )]
    RunningElsewhere { run_id: RunId, hostname: String },

    #[error("run '{run_id}' is still running as pid {pid}")]
    StillRunning { run_id: RunId, pid: u32 },

    #[error("interactive input failed: {0}")]
    Interaction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
