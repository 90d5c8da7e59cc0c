// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Internal tool definition and argv construction.
//!
//! A [`ToolDefinition`] is the fully-expanded form of a config tool entry:
//! an argv template plus a parameter table. Arguments supplied by the LLM
//! are injected as argv entries, option values, or stdin bytes; characters
//! pass through as-is and no shell ever interpolates them.

use delta_core::message::FunctionSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::template;

/// Name of the built-in human-input pseudo-tool.
///
/// Recognised by the scheduler before tool lookup; never expanded into a
/// child process.
pub const ASK_HUMAN: &str = "ask_human";

/// How a parameter's value reaches the child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InjectionMode {
    /// Positional argv entry, optionally at a fixed position.
    Argument {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    /// Named flag followed by the value (`--flag value`).
    Option { flag: String },
    /// Fed via standard input. At most one per tool.
    Stdin,
}

/// One declared parameter.
///
/// The structural type is always `string` in the schema presented to the
/// LLM; numeric and boolean argument values are coerced to canonical text
/// at injection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub inject: InjectionMode,
}

/// Which simplified syntax a definition was expanded from (transparency
/// for `tool expand` output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "syntax", content = "template", rename_all = "snake_case")]
pub enum ToolSource {
    Exec(String),
    Shell(String),
}

/// Fully-expanded tool: argv prefix plus parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Argv template. Exec-mode tokens may embed `${name}` placeholders
    /// which are substituted (as argv text, not shell text) at build time.
    pub command: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Original simplified template, when one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ToolSource>,
}

/// A ready-to-spawn invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// Argument-validation failures.
///
/// These are recoverable: the engine surfaces them to the LLM as an error
/// observation rather than terminating the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("tool '{tool}' requires parameter '{param}', which was not provided")]
    MissingParameter { tool: String, param: String },

    #[error("tool '{tool}' parameter '{param}' must be a string, number, or boolean (got {kind})")]
    UnsupportedValue { tool: String, param: String, kind: &'static str },
}

/// Coerce an argument value to its canonical text form.
fn value_to_text(
    tool: &str,
    param: &str,
    value: &serde_json::Value,
) -> Result<String, InvocationError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Err(InvocationError::UnsupportedValue {
            tool: tool.to_string(),
            param: param.to_string(),
            kind: "null",
        }),
        serde_json::Value::Array(_) => Err(InvocationError::UnsupportedValue {
            tool: tool.to_string(),
            param: param.to_string(),
            kind: "array",
        }),
        serde_json::Value::Object(_) => Err(InvocationError::UnsupportedValue {
            tool: tool.to_string(),
            param: param.to_string(),
            kind: "object",
        }),
    }
}

impl ToolDefinition {
    /// Names of placeholders that appear in the argv template.
    fn template_bound(&self) -> HashSet<String> {
        self.command
            .iter()
            .flat_map(|token| template::placeholders(token))
            .map(|ph| ph.name)
            .collect()
    }

    /// Build the final argv and stdin payload for the given arguments.
    ///
    /// Every declared parameter must be present. Values bound to template
    /// placeholders are spliced into their tokens; remaining parameters are
    /// injected in declaration order per their mode.
    pub fn build_invocation(
        &self,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Invocation, InvocationError> {
        let mut values: Vec<(String, String)> = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let value = args.get(&param.name).ok_or_else(|| {
                InvocationError::MissingParameter {
                    tool: self.name.clone(),
                    param: param.name.clone(),
                }
            })?;
            values.push((param.name.clone(), value_to_text(&self.name, &param.name, value)?));
        }
        let lookup = |name: &str| -> Option<String> {
            values.iter().find(|(n, _)| n == name).map(|(_, v)| v.clone())
        };

        let mut argv: Vec<String> = self
            .command
            .iter()
            .map(|token| template::substitute(token, |ph| lookup(&ph.name)))
            .collect();

        let bound = self.template_bound();
        let mut stdin: Option<Vec<u8>> = None;
        let base_len = argv.len();
        for (param, (_, value)) in self.parameters.iter().zip(values.iter()) {
            if bound.contains(&param.name) {
                continue;
            }
            match &param.inject {
                InjectionMode::Argument { position } => match position {
                    Some(pos) => {
                        let at = (base_len + pos).min(argv.len());
                        argv.insert(at, value.clone());
                    }
                    None => argv.push(value.clone()),
                },
                InjectionMode::Option { flag } => {
                    argv.push(flag.clone());
                    argv.push(value.clone());
                }
                InjectionMode::Stdin => {
                    stdin = Some(value.clone().into_bytes());
                }
            }
        }

        Ok(Invocation { argv, stdin })
    }

    /// JSON-Schema function description advertised to the LLM.
    pub fn function_schema(&self) -> FunctionSchema {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), "string".into());
            if let Some(desc) = &param.description {
                prop.insert("description".to_string(), desc.clone().into());
            }
            properties.insert(param.name.clone(), prop.into());
            required.push(serde_json::Value::from(param.name.clone()));
        }
        FunctionSchema {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
