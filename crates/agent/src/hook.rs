// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle hook definitions.
//!
//! Hooks are external commands invoked through file-based IPC at five
//! points of the T-A-O loop. The definitions here are pure config; the
//! execution protocol lives in the engine's hook executor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default hook timeout in milliseconds.
pub const DEFAULT_HOOK_TIMEOUT_MS: u64 = 5000;

/// The five lifecycle points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    PreLlmReq,
    PostLlmResp,
    PreToolExec,
    PostToolExec,
    OnError,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::PreLlmReq => "pre_llm_req",
            HookKind::PostLlmResp => "post_llm_resp",
            HookKind::PreToolExec => "pre_tool_exec",
            HookKind::PostToolExec => "post_tool_exec",
            HookKind::OnError => "on_error",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One configured hook: a command vector and a timeout.
///
/// `${AGENT_HOME}` in command elements is substituted at invocation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDef {
    pub command: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HOOK_TIMEOUT_MS
}

/// The optional hook for each lifecycle point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LifecycleHooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_llm_req: Option<HookDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_llm_resp: Option<HookDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_tool_exec: Option<HookDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_tool_exec: Option<HookDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<HookDef>,
}

impl LifecycleHooks {
    pub fn get(&self, kind: HookKind) -> Option<&HookDef> {
        match kind {
            HookKind::PreLlmReq => self.pre_llm_req.as_ref(),
            HookKind::PostLlmResp => self.post_llm_resp.as_ref(),
            HookKind::PreToolExec => self.pre_tool_exec.as_ref(),
            HookKind::PostToolExec => self.post_tool_exec.as_ref(),
            HookKind::OnError => self.on_error.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre_llm_req.is_none()
            && self.post_llm_resp.is_none()
            && self.pre_tool_exec.is_none()
            && self.post_tool_exec.is_none()
            && self.on_error.is_none()
    }
}
