// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash recovery for runs whose metadata still says RUNNING.
//!
//! Three layers, each erring on the side of refusing cleanup:
//!
//! 1. Host check: a different hostname means the run may be alive on
//!    another machine; only `--force` overrides.
//! 2. PID liveness: signal-0. ESRCH means dead; EPERM means something
//!    lives there and we refuse.
//! 3. PID reuse: a live PID whose process name matches neither the
//!    recorded name nor a known engine name is a recycled PID, so the
//!    original engine is dead.

use delta_core::run::RunMetadata;
use delta_adapters::process;

use crate::error::EngineError;

/// Process names accepted as "one of ours" during the reuse check.
const ENGINE_PROCESS_NAMES: &[&str] = &["delta"];

/// Outcome of the three-layer inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JanitorDecision {
    /// The recorded process is gone; safe to reclassify as INTERRUPTED.
    Dead { reason: String },
}

/// Decide whether a RUNNING run is actually alive.
///
/// Returns `Ok(Dead)` when cleanup is safe, or an error explaining why the
/// run must be left alone.
pub fn inspect(metadata: &RunMetadata, force: bool) -> Result<JanitorDecision, EngineError> {
    let current_host = process::current_hostname();
    if metadata.hostname != current_host {
        if force {
            return Ok(JanitorDecision::Dead {
                reason: format!(
                    "forced cleanup: run was started on host '{}'",
                    metadata.hostname
                ),
            });
        }
        return Err(EngineError::RunningElsewhere {
            run_id: metadata.run_id.clone(),
            hostname: metadata.hostname.clone(),
        });
    }

    if !process::pid_alive(metadata.pid) {
        return Ok(JanitorDecision::Dead {
            reason: format!("process {} no longer exists", metadata.pid),
        });
    }

    match process::process_name(metadata.pid) {
        Some(name) => {
            let ours = name == metadata.process_name
                || ENGINE_PROCESS_NAMES.contains(&name.as_str())
                || name == process::current_process_name();
            if ours {
                tracing::debug!(
                    run_id = %metadata.run_id,
                    pid = metadata.pid,
                    name = %name,
                    "janitor: engine process still alive, refusing cleanup"
                );
                Err(EngineError::StillRunning {
                    run_id: metadata.run_id.clone(),
                    pid: metadata.pid,
                })
            } else {
                Ok(JanitorDecision::Dead {
                    reason: format!(
                        "pid {} was reused by '{}' (expected '{}')",
                        metadata.pid, name, metadata.process_name
                    ),
                })
            }
        }
        // Can't read the name: something is alive at that PID and we
        // cannot prove it isn't the engine.
        None => Err(EngineError::StillRunning {
            run_id: metadata.run_id.clone(),
            pid: metadata.pid,
        }),
    }
}

#[cfg(test)]
#[path = "janitor_tests.rs"]
mod tests;
