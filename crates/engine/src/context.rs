// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context builder: composes the message list for the next LLM call.
//!
//! Walks the agent's context manifest in order. The result is a pure
//! function of the manifest, the filesystem sources, and the journal:
//! rebuilding from the same journal always yields the same conversation,
//! which is what makes stateless resume possible.

use delta_agent::context::{ContextSource, OnError, OnMissing, SourceRole};
use delta_agent::template::expand_path_vars;
use delta_agent::Agent;
use delta_core::event::{Event, JournalEntry};
use delta_core::message::ChatMessage;
use delta_adapters::subprocess::{run_command, CommandSpec};
use std::path::Path;
use thiserror::Error;

/// Fatal context-assembly failures.
///
/// Only sources that explicitly opt into strictness (`on_missing: error`,
/// `on_error: fail`) produce these.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context file missing: {0}")]
    MissingFile(String),

    #[error("context command {command:?} failed with {detail}")]
    CommandFailed { command: Vec<String>, detail: String },

    #[error("context command could not be spawned: {0}")]
    Spawn(#[from] delta_adapters::subprocess::SpawnError),

    #[error("IO error reading context source: {0}")]
    Io(#[from] std::io::Error),
}

fn message(role: SourceRole, content: String) -> ChatMessage {
    match role {
        SourceRole::System => ChatMessage::system(content),
        SourceRole::User => ChatMessage::user(content),
    }
}

/// Build the ordered message list for one LLM call.
pub async fn build_messages(
    agent: &Agent,
    workspace_root: &Path,
    entries: &[JournalEntry],
) -> Result<Vec<ChatMessage>, ContextError> {
    let mut messages = Vec::new();

    for source in &agent.manifest.sources {
        match source {
            ContextSource::File { path, role, on_missing } => {
                let expanded = expand_path_vars(path, &agent.home, workspace_root);
                match std::fs::read_to_string(&expanded) {
                    Ok(content) => messages.push(message(*role, content)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => match on_missing {
                        OnMissing::Error => return Err(ContextError::MissingFile(expanded)),
                        OnMissing::Skip => {}
                        OnMissing::Empty => messages.push(message(*role, String::new())),
                    },
                    Err(e) => return Err(e.into()),
                }
            }

            ContextSource::ComputedFile { command, role, on_error, max_bytes } => {
                let argv: Vec<String> = command
                    .iter()
                    .map(|item| expand_path_vars(item, &agent.home, workspace_root))
                    .collect();
                let spec = CommandSpec::new(argv.clone(), workspace_root)
                    .capture_limit(*max_bytes);
                let captured = run_command(spec).await?;

                if captured.success() {
                    let mut content = captured.stdout_lossy();
                    if captured.stdout_truncated {
                        let dropped = captured.stdout_total - captured.stdout.len() as u64;
                        content.push_str(&format!("\n[... truncated {} bytes]", dropped));
                    }
                    messages.push(message(*role, content));
                } else {
                    let detail = if captured.timed_out {
                        "timeout".to_string()
                    } else {
                        format!(
                            "exit code {}: {}",
                            captured.exit_code.unwrap_or(-1),
                            captured.stderr_lossy().trim()
                        )
                    };
                    match on_error {
                        OnError::Fail => {
                            return Err(ContextError::CommandFailed { command: argv, detail })
                        }
                        OnError::Insert => messages.push(message(
                            *role,
                            format!("[context command failed: {}]", detail),
                        )),
                    }
                }
            }

            ContextSource::Journal { max_iterations } => {
                messages.extend(journal_messages(entries, *max_iterations));
            }
        }
    }

    Ok(messages)
}

/// Convert journal events to conversation messages.
///
/// With `max_iterations = Some(n)`, the window starts at the n-th THOUGHT
/// from the end and earlier events are dropped. Events other than
/// USER_MESSAGE, THOUGHT, and ACTION_RESULT carry no conversation content
/// and are skipped.
pub fn journal_messages(
    entries: &[JournalEntry],
    max_iterations: Option<usize>,
) -> Vec<ChatMessage> {
    let start = match max_iterations {
        Some(n) if n > 0 => {
            let thought_indexes: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| matches!(e.event, Event::Thought { .. }))
                .map(|(i, _)| i)
                .collect();
            if thought_indexes.len() > n {
                thought_indexes[thought_indexes.len() - n]
            } else {
                0
            }
        }
        _ => 0,
    };

    entries[start..]
        .iter()
        .filter_map(|entry| match &entry.event {
            Event::UserMessage { content } => Some(ChatMessage::user(content.clone())),
            Event::Thought { content, tool_calls } => {
                Some(ChatMessage::assistant(content.clone(), tool_calls.clone()))
            }
            Event::ActionResult { call_id, observation, .. } => {
                Some(ChatMessage::tool(call_id.clone(), observation.clone()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
