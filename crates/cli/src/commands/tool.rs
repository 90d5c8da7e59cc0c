// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `delta tool expand` - show the fully-expanded internal tool table for a
//! config file. Transparency tool: what the engine will actually execute,
//! with nothing inferred left implicit.

use anyhow::Result;
use clap::{Args, Subcommand};
use delta_agent::config::AgentConfig;
use delta_agent::expand::expand_tools;
use delta_agent::tool::{InjectionMode, ToolDefinition, ToolSource};
use std::path::PathBuf;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct ToolArgs {
    #[command(subcommand)]
    pub command: ToolCommands,
}

#[derive(Subcommand)]
pub enum ToolCommands {
    /// Print the expanded tool table for a config.yaml
    Expand {
        /// Path to a config.yaml (or an agent directory containing one)
        config_path: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(args: ToolArgs) -> Result<()> {
    match args.command {
        ToolCommands::Expand { config_path, json } => expand(&config_path, json),
    }
}

fn expand(config_path: &std::path::Path, json: bool) -> Result<()> {
    let file = if config_path.is_dir() {
        config_path.join("config.yaml")
    } else {
        config_path.to_path_buf()
    };
    let bytes = std::fs::read(&file)
        .map_err(|e| ExitError::new(1, format!("cannot read {}: {}", file.display(), e)))?;
    let config: AgentConfig = serde_yaml::from_slice(&bytes)
        .map_err(|e| ExitError::new(1, format!("invalid config: {}", e)))?;
    let tools = expand_tools(&config.tools)
        .map_err(|e| ExitError::new(1, e.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else {
        print!("{}", render_text(&tools));
    }
    Ok(())
}

fn render_text(tools: &[ToolDefinition]) -> String {
    if tools.is_empty() {
        return "no tools defined\n".to_string();
    }
    let mut out = String::new();
    for tool in tools {
        out.push_str(&format!("tool: {}\n", tool.name));
        if let Some(desc) = &tool.description {
            out.push_str(&format!("  description: {}\n", desc));
        }
        match &tool.source {
            Some(ToolSource::Exec(template)) => {
                out.push_str(&format!("  source: exec {:?}\n", template));
            }
            Some(ToolSource::Shell(template)) => {
                out.push_str(&format!("  source: shell {:?}\n", template));
            }
            None => out.push_str("  source: explicit command\n"),
        }
        out.push_str(&format!("  command: {:?}\n", tool.command));
        if tool.parameters.is_empty() {
            out.push_str("  parameters: none\n");
        } else {
            out.push_str("  parameters:\n");
            for param in &tool.parameters {
                let mode = match &param.inject {
                    InjectionMode::Argument { position: None } => "argument".to_string(),
                    InjectionMode::Argument { position: Some(p) } => {
                        format!("argument @ position {}", p)
                    }
                    InjectionMode::Option { flag } => format!("option {}", flag),
                    InjectionMode::Stdin => "stdin".to_string(),
                };
                match &param.description {
                    Some(desc) => {
                        out.push_str(&format!("    - {} ({}): {}\n", param.name, mode, desc))
                    }
                    None => out.push_str(&format!("    - {} ({})\n", param.name, mode)),
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
