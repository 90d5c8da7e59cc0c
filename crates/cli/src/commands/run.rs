// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `delta run` - start a new run.

use anyhow::Result;
use clap::Args;
use delta_core::id::RunId;
use delta_engine::{start_new_run, Engine, SignalWatcher, StartOptions};
use std::path::PathBuf;

use super::{finish_run, llm_from_env};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct RunArgs {
    /// Agent directory (must contain config.yaml and system_prompt.md)
    #[arg(long)]
    pub agent: PathBuf,

    /// Workspace directory (default: current directory)
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Caller-supplied run ID; must not already exist in the workspace
    #[arg(long = "run-id")]
    pub run_id: Option<String>,

    /// The task to hand the agent
    #[arg(short = 'm', long = "task")]
    pub task: Option<String>,

    /// Answer ask_human prompts interactively on this terminal
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Silent mode: suppress the start-up banner
    #[arg(short = 'y', long = "yes")]
    pub silent: bool,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let task = match args.task {
        Some(task) => task,
        None => {
            return Err(ExitError::new(1, "no task given; pass one with -m/--task").into());
        }
    };
    let work_dir = match args.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let llm = llm_from_env()?;
    let session = start_new_run(StartOptions {
        agent_dir: args.agent,
        workspace_dir: work_dir,
        task,
        run_id: args.run_id.map(RunId::new),
    })?;

    if !args.silent {
        eprintln!(
            "run {} started (agent: {})",
            session.run_id, session.agent.config.name
        );
    }

    let signals = SignalWatcher::install()?;
    let outcome = Engine::new(llm, session, signals, args.interactive).run().await?;
    finish_run(outcome)
}
