// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context manifest: the ordered sources that compose each LLM request.
//!
//! The manifest lives inline in `config.yaml` under `context:` or in a
//! sibling `context.yaml`. When neither is present the default manifest is
//! the agent's system prompt followed by the full journal conversation.

use serde::{Deserialize, Serialize};

/// Role assigned to a file or computed source's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    System,
    User,
}

/// Behaviour when a `file` source's path does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Fail the run.
    Error,
    /// Omit the message entirely.
    Skip,
    /// Emit a message with empty content.
    Empty,
}

impl Default for OnMissing {
    fn default() -> Self {
        OnMissing::Skip
    }
}

/// Behaviour when a `computed_file` source's command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Fail the run.
    Fail,
    /// Insert an error message in place of the output.
    Insert,
}

impl Default for OnError {
    fn default() -> Self {
        OnError::Fail
    }
}

/// One source in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextSource {
    /// Static file content. The path may use `${AGENT_HOME}` and `${CWD}`.
    File {
        path: String,
        #[serde(default = "default_file_role")]
        role: SourceRole,
        #[serde(default)]
        on_missing: OnMissing,
    },
    /// Content produced by running a command in the workspace.
    ComputedFile {
        command: Vec<String>,
        #[serde(default = "default_computed_role")]
        role: SourceRole,
        #[serde(default)]
        on_error: OnError,
        /// Capture cap in bytes; output beyond this is truncated.
        #[serde(default = "default_computed_cap")]
        max_bytes: usize,
    },
    /// Reconstructed conversation from the current run's journal.
    Journal {
        /// When set, include only the last N iterations (THOUGHT onwards).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_iterations: Option<usize>,
    },
}

fn default_file_role() -> SourceRole {
    SourceRole::System
}

fn default_computed_role() -> SourceRole {
    SourceRole::User
}

fn default_computed_cap() -> usize {
    1024 * 1024
}

/// Ordered list of sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextManifest {
    pub sources: Vec<ContextSource>,
}

impl ContextManifest {
    /// System prompt followed by the full journal conversation.
    pub fn default_manifest() -> Self {
        Self {
            sources: vec![
                ContextSource::File {
                    path: "${AGENT_HOME}/system_prompt.md".to_string(),
                    role: SourceRole::System,
                    on_missing: OnMissing::Error,
                },
                ContextSource::Journal { max_iterations: None },
            ],
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
