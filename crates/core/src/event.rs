// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal event types.
//!
//! One event is one line of `journal.jsonl`. The line format is the event
//! payload flattened next to the envelope fields:
//!
//! ```json
//! {"seq":1,"ts":"2026-08-01T12:00:00.123Z","type":"RUN_START","task":"..."}
//! ```
//!
//! The journal is the single source of truth for a run; conversation state
//! is reconstructed from these events alone (see the context builder).

use crate::run::RunStatus;
use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one hook invocation, as recorded in the audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookOutcome {
    Success,
    Failed,
}

/// Events appended to a run's journal.
///
/// Serializes with `{"type": "EVENT_NAME", ...fields}` format. The set is
/// closed: an unknown type in a journal is a corruption diagnostic, not an
/// extension point, because reconstruction must be able to interpret every
/// line it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// First event of every run.
    #[serde(rename = "RUN_START")]
    RunStart {
        task: String,
        agent_ref: PathBuf,
        /// SHA-256 of the agent's config.yaml at start time.
        config_fingerprint: String,
    },

    /// Text supplied by the user (initial task, resumed human answers).
    #[serde(rename = "USER_MESSAGE")]
    UserMessage { content: String },

    /// One assistant turn: content plus any tool calls it requested.
    ///
    /// Tool calls are carried here rather than in a separate ACTION_REQUEST
    /// event; the call descriptors are authoritative for re-dispatch after
    /// an interrupt.
    #[serde(rename = "THOUGHT")]
    Thought {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// Observation answering one tool call.
    #[serde(rename = "ACTION_RESULT")]
    ActionResult {
        call_id: String,
        observation: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        truncated: bool,
        /// Downstream consumers must redact when logging.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        sensitive: bool,
    },

    /// Audit record for one lifecycle-hook invocation.
    #[serde(rename = "HOOK_EXECUTION_AUDIT")]
    HookExecutionAudit {
        hook: String,
        outcome: HookOutcome,
        /// Relative to the run directory.
        io_path: PathBuf,
    },

    /// Engine-authored note (retry notice, janitor cleanup).
    #[serde(rename = "SYSTEM_MESSAGE")]
    SystemMessage { content: String },

    /// Terminal event.
    #[serde(rename = "RUN_END")]
    RunEnd {
        status: RunStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl Event {
    /// Short name used in log lines and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::RunStart { .. } => "RUN_START",
            Event::UserMessage { .. } => "USER_MESSAGE",
            Event::Thought { .. } => "THOUGHT",
            Event::ActionResult { .. } => "ACTION_RESULT",
            Event::HookExecutionAudit { .. } => "HOOK_EXECUTION_AUDIT",
            Event::SystemMessage { .. } => "SYSTEM_MESSAGE",
            Event::RunEnd { .. } => "RUN_END",
        }
    }
}

/// One journal line: envelope (seq, timestamp) plus the flattened event.
///
/// `seq` is dense and 1-based within a run; `ts` is ISO-8601 UTC with
/// millisecond precision, assigned by the journal at append time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub ts: String,
    #[serde(flatten)]
    pub event: Event,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
