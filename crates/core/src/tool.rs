// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool-call descriptor shared by journal events and chat messages.

use serde::{Deserialize, Serialize};

/// One tool call requested by the assistant.
///
/// `arguments` is the structured object the LLM produced, already parsed
/// from its JSON-encoded wire form. The `id` is minted by the LLM provider
/// and must round-trip unchanged into the matching ACTION_RESULT so the
/// model can pair observations with calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: serde_json::Map::new(),
        }
    }

    /// Add an argument (test builders and synthetic calls).
    pub fn with_arg(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    /// Fetch a string argument by name.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}
