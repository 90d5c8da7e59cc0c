// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `delta continue` - resume an explicitly named run.
//!
//! There is no implicit "latest run"; a missing --run-id is a usage error
//! (clap enforces it) and the message points at list-runs.

use anyhow::Result;
use clap::Args;
use delta_core::id::RunId;
use delta_engine::{resume_run, Engine, ResumeOptions, SignalWatcher};
use std::path::PathBuf;

use super::{finish_run, llm_from_env};

#[derive(Args)]
pub struct ContinueArgs {
    /// Run to resume (see `delta list-runs --resumable`)
    #[arg(long = "run-id", required = true)]
    pub run_id: String,

    /// Workspace directory (default: current directory)
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Answer ask_human prompts interactively on this terminal
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Clean up a RUNNING run recorded by another host
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: ContinueArgs) -> Result<()> {
    let work_dir = match args.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let llm = llm_from_env()?;
    let session = resume_run(ResumeOptions {
        workspace_dir: work_dir,
        run_id: RunId::new(args.run_id),
        force: args.force,
    })?;

    let signals = SignalWatcher::install()?;
    let outcome = Engine::new(llm, session, signals, args.interactive).run().await?;
    finish_run(outcome)
}
