// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `delta list-runs` - enumerate runs, newest first.

use anyhow::Result;
use clap::Args;
use delta_core::run::RunStatus;
use delta_storage::{now_ms, Workspace};
use std::path::PathBuf;

use crate::exit_error::ExitError;
use crate::output::{render_runs, OutputFormat};

#[derive(Args)]
pub struct ListRunsArgs {
    /// Workspace directory (default: current directory)
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Only runs with this status (e.g. FAILED, waiting_for_input)
    #[arg(long)]
    pub status: Option<String>,

    /// Only runs that `continue` can pick up
    #[arg(long)]
    pub resumable: bool,

    /// Print only the newest matching run
    #[arg(long)]
    pub first: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute(args: ListRunsArgs) -> Result<()> {
    let work_dir = match args.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let status_filter: Option<RunStatus> = match &args.status {
        Some(text) => Some(
            text.parse::<RunStatus>()
                .map_err(|e| ExitError::new(1, e))?,
        ),
        None => None,
    };

    let workspace = Workspace::open_or_init(&work_dir)?;
    let mut runs = workspace.list_runs()?;

    if let Some(status) = status_filter {
        runs.retain(|m| m.status == status);
    }
    if args.resumable {
        runs.retain(|m| m.is_resumable());
    }
    if args.first {
        runs.truncate(1);
    }

    print!("{}", render_runs(&runs, args.format, now_ms()));
    Ok(())
}
