// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Open handle to one run: journal, metadata, paths, agent.
//!
//! Created by the lifecycle module (new run or resume) and consumed by the
//! scheduler. All journal appends and status flips go through here so the
//! ordering invariant (status written after the terminal event) lives in
//! one place.

use delta_agent::Agent;
use delta_core::event::Event;
use delta_core::id::RunId;
use delta_core::run::{RunMetadata, RunStatus};
use delta_storage::{update_metadata, Journal, RunPaths, Workspace};

use crate::error::EngineError;

#[derive(Debug)]
pub struct RunSession {
    pub workspace: Workspace,
    pub agent: Agent,
    pub run_id: RunId,
    pub paths: RunPaths,
    pub journal: Journal,
    pub metadata: RunMetadata,
    /// True when this session picked up an existing journal.
    pub resumed: bool,
}

impl RunSession {
    /// Append one event; journal write failures are fatal.
    pub fn append(&mut self, event: &Event) -> Result<u64, EngineError> {
        Ok(self.journal.append(event)?)
    }

    /// Persist a status change (and optional terminal error) to
    /// `metadata.json`.
    pub fn set_status(
        &mut self,
        status: RunStatus,
        error: Option<String>,
    ) -> Result<(), EngineError> {
        self.metadata = update_metadata(self.paths.run_dir(), |m| {
            m.status = status;
            m.error = error.clone();
        })?;
        tracing::info!(run_id = %self.run_id, status = %status, "run status");
        Ok(())
    }

    /// Record a completed iteration.
    pub fn record_iteration(&mut self, iteration: u32) -> Result<(), EngineError> {
        self.metadata = update_metadata(self.paths.run_dir(), |m| {
            m.iterations_completed = iteration;
        })?;
        Ok(())
    }

    /// Terminal path: append RUN_END, then persist the status.
    pub fn finish(
        &mut self,
        status: RunStatus,
        reason: Option<String>,
    ) -> Result<(), EngineError> {
        self.append(&Event::RunEnd { status, reason: reason.clone() })?;
        let error = if status == RunStatus::Failed { reason } else { None };
        self.set_status(status, error)
    }
}
