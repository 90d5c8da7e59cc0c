// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! delta-agent: agent configuration loading and tool expansion.
//!
//! An agent is a directory with a declarative `config.yaml`, a
//! `system_prompt.md`, optional tool scripts, and an optional context
//! manifest. This crate parses those files into typed definitions and
//! expands the simplified `exec:`/`shell:` tool syntax into the internal
//! argv-based [`ToolDefinition`] the engine executes. The agent directory
//! is read-only to the engine.

pub mod config;
pub mod context;
pub mod error;
pub mod expand;
pub mod hook;
pub mod lex;
pub mod template;
pub mod tool;

pub use config::{Agent, AgentConfig, LlmParams};
pub use context::{ContextManifest, ContextSource, OnError, OnMissing, SourceRole};
pub use error::{AgentError, ToolConfigError};
pub use hook::{HookDef, HookKind, LifecycleHooks};
pub use tool::{InjectionMode, ToolDefinition, ToolParameter, ToolSource};
