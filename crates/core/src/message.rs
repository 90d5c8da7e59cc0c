// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-completion request/response types.
//!
//! This is the wire contract with the LLM endpoint: messages in, assistant
//! message with optional tool calls out. The request payload here is also
//! what the `pre_llm_req` hook sees (and may replace) as JSON, so field
//! names are stable.

use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in the conversation sent to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    /// Present on `tool` messages: the call this observation answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Present on `assistant` messages that requested tool calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), tool_call_id: None, tool_calls: vec![] }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), tool_call_id: None, tool_calls: vec![] }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self { role: Role::Assistant, content: content.into(), tool_call_id: None, tool_calls }
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: Some(call_id.into()),
            tool_calls: vec![],
        }
    }
}

/// JSON-Schema description of one callable function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tool entry in the request payload (`{"type":"function","function":{...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

impl ToolSchema {
    pub fn function(schema: FunctionSchema) -> Self {
        Self { kind: "function".to_string(), function: schema }
    }
}

/// Full chat-completion request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
}

/// Tool call as the provider returns it: arguments are a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded argument object.
    pub arguments: String,
}

impl WireToolCall {
    /// Decode the argument string into a structured [`ToolCall`].
    ///
    /// An empty argument string decodes to an empty object (some providers
    /// send `""` for zero-argument calls).
    pub fn parse(&self) -> Result<ToolCall, serde_json::Error> {
        let arguments = if self.function.arguments.trim().is_empty() {
            serde_json::Map::new()
        } else {
            serde_json::from_str(&self.function.arguments)?
        };
        Ok(ToolCall {
            id: self.id.clone(),
            name: self.function.name.clone(),
            arguments,
        })
    }
}

/// Assistant message returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
}

impl ChatResponse {
    /// Plain-text reply with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: vec![] }
    }

    /// Reply requesting the given calls.
    pub fn calls(calls: Vec<WireToolCall>) -> Self {
        Self { content: None, tool_calls: calls }
    }
}

/// Build a wire tool call from structured arguments (tests, fakes).
pub fn wire_call(
    id: &str,
    name: &str,
    arguments: &serde_json::Value,
) -> Result<WireToolCall, serde_json::Error> {
    Ok(WireToolCall {
        id: id.to_string(),
        function: WireFunctionCall {
            name: name.to_string(),
            arguments: serde_json::to_string(arguments)?,
        },
    })
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
