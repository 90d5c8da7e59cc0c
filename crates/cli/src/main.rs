// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! delta - the Delta Engine CLI
//!
//! Exit codes for run-driving commands: 0 COMPLETED, 1 FAILED,
//! 101 WAITING_FOR_INPUT, 130 INTERRUPTED. Errors go to stderr;
//! structured output (list-runs, tool expand) goes to stdout.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "delta",
    version,
    about = "Delta Engine - drive an LLM agent through a journaled Think-Act-Observe loop"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new run
    Run(commands::run::RunArgs),
    /// Resume a specific run
    Continue(commands::continue_cmd::ContinueArgs),
    /// Enumerate runs in a workspace
    ListRuns(commands::list_runs::ListRunsArgs),
    /// Tool-configuration utilities
    Tool(commands::tool::ToolArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        let code = e.downcast_ref::<exit_error::ExitError>().map_or(1, |c| c.code);
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Continue(args) => commands::continue_cmd::execute(args).await,
        Commands::ListRuns(args) => commands::list_runs::execute(args),
        Commands::Tool(args) => commands::tool::execute(args),
    }
}
