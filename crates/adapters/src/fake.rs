// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted LLM fake for engine tests.
//!
//! Responses are popped in order; every request the scheduler sends is
//! recorded for assertions. When the script runs dry the fake answers with
//! a plain "done" message (no tool calls), which terminates a run cleanly.

use crate::llm::{LlmClient, LlmError};
use async_trait::async_trait;
use delta_core::message::{wire_call, ChatRequest, ChatResponse, WireToolCall};
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Default)]
pub struct FakeLlm {
    script: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text assistant reply.
    pub fn push_text(&self, content: &str) {
        self.script.lock().push_back(Ok(ChatResponse::text(content)));
    }

    /// Queue a reply with a single tool call.
    pub fn push_tool_call(&self, id: &str, tool: &str, arguments: serde_json::Value) {
        #[allow(clippy::unwrap_used)]
        let call = wire_call(id, tool, &arguments).unwrap();
        self.script.lock().push_back(Ok(ChatResponse::calls(vec![call])));
    }

    /// Queue a reply with several tool calls in one turn.
    pub fn push_tool_calls(&self, calls: Vec<WireToolCall>) {
        self.script.lock().push_back(Ok(ChatResponse::calls(calls)));
    }

    /// Queue an error.
    pub fn push_error(&self, error: LlmError) {
        self.script.lock().push_back(Err(error));
    }

    /// Requests the scheduler has sent so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::text("done")))
    }
}
