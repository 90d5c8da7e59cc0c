// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! delta-core: shared types for the Delta run engine.
//!
//! Everything in this crate is plain data: journal events, run status and
//! metadata, chat messages, and tool-call descriptors. No I/O happens here;
//! persistence lives in `delta-storage` and process execution in
//! `delta-adapters`.

pub mod event;
pub mod id;
pub mod message;
pub mod run;
pub mod tool;

pub use event::{Event, HookOutcome, JournalEntry};
pub use id::RunId;
pub use message::{
    wire_call, ChatMessage, ChatRequest, ChatResponse, FunctionSchema, Role, ToolSchema,
    WireFunctionCall, WireToolCall,
};
pub use run::{RunMetadata, RunStatus};
pub use tool::ToolCall;
