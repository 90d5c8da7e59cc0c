// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! delta-storage: durable run state.
//!
//! Three concerns live here, all filesystem-backed:
//!
//! - the append-only JSONL journal (`journal.jsonl`), the source of truth
//!   for a run's conversation;
//! - atomic `metadata.json` persistence (temp file + rename);
//! - the workspace control plane: `.delta/` layout, run-directory creation
//!   and listing, run-ID allocation.
//!
//! There is no lock manager. Isolation between concurrent runs comes from
//! disjoint run directories and the janitor's PID checks.

pub mod journal;
pub mod metadata;
pub mod paths;
pub mod workspace;

pub use journal::{Journal, JournalError};
pub use metadata::{load_metadata, now_ms, save_metadata, update_metadata, MetadataError};
pub use paths::RunPaths;
pub use workspace::{Workspace, WorkspaceError, CONTROL_DIR, FORMAT_VERSION};
