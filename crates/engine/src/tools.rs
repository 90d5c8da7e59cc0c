// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool executor.
//!
//! Takes an expanded tool definition and the arguments the LLM supplied,
//! spawns the child in the workspace, captures bounded output, writes the
//! full invocation record under `io/tool_executions/`, and composes the
//! observation string for the ACTION_RESULT event.
//!
//! Validation failures (missing or non-scalar arguments) never terminate
//! the run; they come back as error observations so the model can correct
//! itself on the next turn.

use delta_agent::tool::ToolDefinition;
use delta_core::id::RunId;
use delta_core::tool::ToolCall;
use delta_adapters::subprocess::{run_command, CapturedOutput, CommandSpec};
use delta_storage::RunPaths;
use std::path::Path;
use std::time::Duration;

/// What one tool call produced, ready to journal.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub observation: String,
    pub exit_code: Option<i32>,
    pub truncated: bool,
    /// Engine-fabricated error observation; no child process ran. The
    /// scheduler offers these to the on_error hook.
    pub synthetic: bool,
}

impl ToolOutcome {
    /// Synthetic error outcome for calls that never reached a child
    /// process (unknown tool, bad arguments, spawn failure).
    pub fn error(message: impl Into<String>) -> Self {
        Self { observation: message.into(), exit_code: None, truncated: false, synthetic: true }
    }

    /// Engine-authored observation that is not an error (hook skip).
    pub fn note(message: impl Into<String>) -> Self {
        Self { observation: message.into(), exit_code: None, truncated: false, synthetic: false }
    }
}

/// Execute one tool call.
///
/// `seq` is the journal sequence the ACTION_RESULT will receive; it keys
/// the artifact directory so disk records line up with journal entries.
pub async fn execute_tool(
    workspace_root: &Path,
    paths: &RunPaths,
    run_id: &RunId,
    tool: &ToolDefinition,
    call: &ToolCall,
    seq: u64,
    timeout: Duration,
    capture_limit: usize,
) -> ToolOutcome {
    let invocation = match tool.build_invocation(&call.arguments) {
        Ok(invocation) => invocation,
        Err(e) => {
            tracing::debug!(tool = %tool.name, call_id = %call.id, error = %e, "invalid tool arguments");
            return ToolOutcome::error(format!("Error: {}", e));
        }
    };

    let mut spec = CommandSpec::new(invocation.argv.clone(), workspace_root)
        .env("DELTA_RUN_ID", run_id.as_str())
        .timeout(timeout)
        .capture_limit(capture_limit);
    if let Some(bytes) = invocation.stdin.clone() {
        spec = spec.stdin_bytes(bytes);
    }

    let captured = match run_command(spec).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::warn!(tool = %tool.name, error = %e, "tool spawn failed");
            return ToolOutcome::error(format!("Error: failed to start tool '{}': {}", tool.name, e));
        }
    };

    write_invocation_record(paths, seq, tool, &invocation.argv, invocation.stdin.as_deref(), &captured);

    ToolOutcome {
        observation: compose_observation(&tool.name, &captured),
        exit_code: captured.exit_code,
        truncated: captured.truncated(),
        synthetic: false,
    }
}

/// Best-effort artifact dump; the journal stays authoritative if disk
/// space runs out here.
fn write_invocation_record(
    paths: &RunPaths,
    seq: u64,
    tool: &ToolDefinition,
    argv: &[String],
    stdin: Option<&[u8]>,
    captured: &CapturedOutput,
) {
    let dir = paths.tool_execution_dir(seq, &tool.name);
    let result: std::io::Result<()> = (|| {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("argv.json"), serde_json::to_vec_pretty(argv).unwrap_or_default())?;
        if let Some(bytes) = stdin {
            std::fs::write(dir.join("stdin.bytes"), bytes)?;
        }
        std::fs::write(dir.join("stdout.log"), &captured.stdout)?;
        std::fs::write(dir.join("stderr.log"), &captured.stderr)?;
        let exit_text = match captured.exit_code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        };
        std::fs::write(dir.join("exit_code.txt"), format!("{}\n", exit_text))?;
        std::fs::write(
            dir.join("duration_ms.txt"),
            format!("{}\n", captured.duration.as_millis()),
        )?;
        Ok(())
    })();
    if let Err(e) = result {
        tracing::warn!(dir = %dir.display(), error = %e, "failed to write tool invocation record");
    }
}

/// Compose the observation the LLM sees.
fn compose_observation(tool_name: &str, captured: &CapturedOutput) -> String {
    let stdout = captured.stdout_lossy();
    let stderr = captured.stderr_lossy();

    let mut observation = if captured.timed_out {
        let mut text = format!(
            "tool '{}' timed out after {}s",
            tool_name,
            captured.duration.as_secs()
        );
        if !stderr.is_empty() {
            text.push_str("\n--- stderr ---\n");
            text.push_str(&stderr);
        }
        if !stdout.is_empty() {
            text.push_str("\n--- stdout ---\n");
            text.push_str(&stdout);
        }
        text
    } else if captured.exit_code == Some(0) {
        if stderr.is_empty() {
            if stdout.is_empty() {
                "(tool produced no output)".to_string()
            } else {
                stdout
            }
        } else {
            format!("[stderr below stdout]\n{}\n--- stderr ---\n{}", stdout, stderr)
        }
    } else {
        let mut text = match captured.exit_code {
            Some(code) => format!("tool failed with exit code {}", code),
            None => "tool terminated by signal".to_string(),
        };
        if !stderr.is_empty() {
            text.push_str("\n--- stderr ---\n");
            text.push_str(&stderr);
        }
        if !stdout.is_empty() {
            text.push_str("\n--- stdout ---\n");
            text.push_str(&stdout);
        }
        text
    };

    if captured.truncated() {
        let dropped = (captured.stdout_total + captured.stderr_total)
            - (captured.stdout.len() as u64 + captured.stderr.len() as u64);
        observation.push_str(&format!("\n[... truncated {} bytes]", dropped));
    }
    observation
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
