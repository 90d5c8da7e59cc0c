// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run start-up decisions: create a new run or resume an existing one.
//!
//! There is no implicit "latest run": `run` only ever creates (a duplicate
//! caller-supplied ID fails before any file is written) and `continue`
//! only ever resumes an explicitly named run. A resume of a run still
//! marked RUNNING goes through the janitor first.

use delta_agent::Agent;
use delta_core::event::Event;
use delta_core::id::RunId;
use delta_core::run::{RunMetadata, RunStatus};
use delta_adapters::process;
use delta_storage::{
    load_metadata, now_ms, save_metadata, update_metadata, Journal, RunPaths, Workspace,
    WorkspaceError,
};
use std::path::PathBuf;

use crate::error::EngineError;
use crate::human;
use crate::janitor::{self, JanitorDecision};
use crate::session::RunSession;

/// Options for `run`.
#[derive(Debug, Clone)]
pub struct StartOptions {
    pub agent_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub task: String,
    /// Caller-supplied run ID; engine-allocated when absent.
    pub run_id: Option<RunId>,
}

/// Options for `continue`.
#[derive(Debug, Clone)]
pub struct ResumeOptions {
    pub workspace_dir: PathBuf,
    pub run_id: RunId,
    /// Override the janitor's cross-host refusal.
    pub force: bool,
}

/// Create a fresh run directory, journal the opening events, and return a
/// live session.
pub fn start_new_run(opts: StartOptions) -> Result<RunSession, EngineError> {
    let agent = Agent::load(&opts.agent_dir)?;
    let workspace = Workspace::open_or_init(&opts.workspace_dir)?;

    let run_id = match opts.run_id {
        Some(id) => id,
        None => workspace.allocate_run_id(),
    };
    let run_dir = workspace.create_run_dir(&run_id)?;
    let paths = RunPaths::new(&run_dir);

    let now = now_ms();
    let mut metadata = RunMetadata {
        run_id: run_id.clone(),
        task: opts.task.clone(),
        agent_ref: agent.home.clone(),
        status: RunStatus::Running,
        pid: std::process::id(),
        hostname: process::current_hostname(),
        process_name: process::current_process_name(),
        iterations_completed: 0,
        start_time_ms: now,
        updated_at_ms: now,
        error: None,
    };
    save_metadata(&run_dir, &mut metadata)?;

    let mut journal = Journal::open(&run_dir)?;
    journal.append(&Event::RunStart {
        task: opts.task.clone(),
        agent_ref: agent.home.clone(),
        config_fingerprint: agent.fingerprint.clone(),
    })?;
    journal.append(&Event::UserMessage { content: opts.task })?;

    tracing::info!(run_id = %run_id, agent = %agent.config.name, "run created");

    Ok(RunSession {
        workspace,
        agent,
        run_id,
        paths,
        journal,
        metadata,
        resumed: false,
    })
}

/// Resume an existing run.
///
/// The run must be WAITING_FOR_INPUT or INTERRUPTED (or RUNNING with a
/// dead owner, which the janitor reclassifies). A pending interaction
/// answer is journaled here, before the status flips back to RUNNING.
pub fn resume_run(opts: ResumeOptions) -> Result<RunSession, EngineError> {
    let workspace = Workspace::open_or_init(&opts.workspace_dir)?;
    if !workspace.run_exists(&opts.run_id) {
        return Err(WorkspaceError::RunNotFound(opts.run_id).into());
    }
    let run_dir = workspace.run_dir(&opts.run_id);
    let paths = RunPaths::new(&run_dir);
    let metadata = load_metadata(&run_dir)?;

    if metadata.status.is_terminal() {
        return Err(EngineError::NotResumable {
            run_id: opts.run_id,
            status: metadata.status,
        });
    }

    let mut journal = Journal::open(&run_dir)?;

    if metadata.status == RunStatus::Running {
        match janitor::inspect(&metadata, opts.force)? {
            JanitorDecision::Dead { reason } => {
                tracing::info!(run_id = %opts.run_id, reason = %reason, "janitor reclaimed run");
                journal.append(&Event::SystemMessage {
                    content: format!("janitor: marking run interrupted ({})", reason),
                })?;
                update_metadata(&run_dir, |m| m.status = RunStatus::Interrupted)?;
            }
        }
    }

    // Pending human interaction: the answer must exist before we can
    // continue, and it is journaled before anything else happens.
    if let Some(request) = human::pending_request(&paths) {
        match human::read_response(&paths) {
            Some(answer) => {
                journal.append(&Event::ActionResult {
                    call_id: request.call_id.clone(),
                    observation: answer,
                    exit_code: None,
                    truncated: false,
                    sensitive: request.sensitive,
                })?;
                human::clear_interaction(&paths);
                tracing::info!(run_id = %opts.run_id, "interaction answer ingested");
            }
            None => {
                return Err(EngineError::AwaitingResponse {
                    run_id: opts.run_id,
                    response_path: paths.interaction_response(),
                });
            }
        }
    }

    let agent = Agent::load(&metadata.agent_ref)?;

    let metadata = update_metadata(&run_dir, |m| {
        m.status = RunStatus::Running;
        m.pid = std::process::id();
        m.hostname = process::current_hostname();
        m.process_name = process::current_process_name();
        m.error = None;
    })?;

    tracing::info!(run_id = %opts.run_id, "run resumed");

    Ok(RunSession {
        workspace,
        agent,
        run_id: opts.run_id,
        paths,
        journal,
        metadata,
        resumed: true,
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
