// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for agent loading and tool expansion.
//!
//! Everything here is a configuration error: caught at load time, before
//! any run state exists, so failing fast is always safe.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from expanding a tool entry into an internal definition.
#[derive(Debug, Error)]
pub enum ToolConfigError {
    #[error("tool '{tool}': template is empty")]
    EmptyTemplate { tool: String },

    #[error("tool '{tool}': unterminated quote in exec template")]
    UnterminatedQuote { tool: String },

    #[error(
        "tool '{tool}': shell metacharacter '{meta}' in exec template; \
         exec runs without a shell; use shell: if you need pipes or redirection"
    )]
    MetacharacterInExec { tool: String, meta: String },

    #[error(
        "tool '{tool}': parameter '{param}' uses :raw, which is only \
         available in shell: templates"
    )]
    RawInExec { tool: String, param: String },

    #[error("tool '{tool}': duplicate parameter '{param}' in template")]
    DuplicateParameter { tool: String, param: String },

    #[error(
        "tool '{tool}': declared parameter '{param}' does not appear in the \
         template and is not the stdin parameter"
    )]
    UnknownDeclaredParameter { tool: String, param: String },

    #[error(
        "tool '{tool}': stdin parameter '{param}' also appears in the \
         template; a value cannot be injected both ways"
    )]
    StdinParameterInTemplate { tool: String, param: String },

    #[error("tool '{tool}': more than one stdin parameter ('{first}' and '{second}')")]
    MultipleStdinParameters { tool: String, first: String, second: String },

    #[error(
        "tool '{tool}': exactly one of exec:, shell:, or command: must be set"
    )]
    AmbiguousForm { tool: String },

    #[error("tool '{tool}': option-injected parameter '{param}' is missing option_name")]
    MissingOptionName { tool: String, param: String },

    #[error("duplicate tool name '{tool}'")]
    DuplicateTool { tool: String },

    #[error("tool '{tool}': '{name}' is reserved for the built-in human-input tool")]
    ReservedName { tool: String, name: String },
}

/// Errors from loading an agent directory.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent directory not found: {0}")]
    NotFound(PathBuf),

    #[error("missing {file} in agent directory {dir}")]
    MissingFile { dir: PathBuf, file: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config.yaml: {0}")]
    InvalidConfig(#[from] serde_yaml::Error),

    #[error(transparent)]
    Tool(#[from] ToolConfigError),
}
