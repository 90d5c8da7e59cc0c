// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! delta-adapters: the engine's process boundaries.
//!
//! Everything the engine touches outside its own process goes through this
//! crate: the LLM chat-completion endpoint (HTTP), child processes (tools,
//! hooks, computed context sources), and the OS process table (janitor
//! liveness probes).

pub mod llm;
pub mod process;
pub mod subprocess;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use llm::{HttpLlmClient, LlmClient, LlmError, RetryPolicy};
pub use subprocess::{run_command, CapturedOutput, CommandSpec, SpawnError};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLlm;
