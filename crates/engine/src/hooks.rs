// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle-hook executor: file-based IPC with external commands.
//!
//! For each invocation the executor lays out a numbered directory:
//!
//! ```text
//! runtime_io/hooks/{NNN}_{hook}/
//!   input/{context.json, proposed_payload.json | payload.json | payload.dat}
//!   output/{final_payload.json | payload_override.dat | control.json}
//!   execution_meta/{command.txt, stdout.log, stderr.log, exit_code.txt, duration_ms.txt}
//! ```
//!
//! The hook reads from `$DELTA_HOOK_IO_PATH/input/*` and writes to
//! `$DELTA_HOOK_IO_PATH/output/*`. A failing hook (non-zero exit, timeout,
//! or malformed output) never fails the run by itself: the audit records
//! FAILED, the proposed payload stands, and the scheduler proceeds. Every
//! exchange stays inspectable on disk afterwards.

use delta_agent::hook::{HookDef, HookKind};
use delta_agent::template::expand_path_vars;
use delta_core::event::HookOutcome;
use delta_core::id::RunId;
use delta_adapters::subprocess::{run_command, CommandSpec};
use delta_storage::journal::now_iso_ms;
use delta_storage::RunPaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Capture cap per hook stream; hooks are small coordination scripts, not
/// data pipelines.
const HOOK_CAPTURE_LIMIT: usize = 64 * 1024;

/// Payload handed to the hook's input directory.
pub enum HookPayload<'p> {
    /// `pre_llm_req`: written as `input/proposed_payload.json`.
    Proposed(&'p serde_json::Value),
    /// Other structured payloads: written as `input/payload.json`.
    Json(&'p serde_json::Value),
    /// String payloads: written as `input/payload.dat`.
    Text(&'p str),
}

/// `output/control.json` contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookControl {
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub override_args: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub escalate: bool,
}

/// What one hook invocation produced.
#[derive(Debug, Default)]
pub struct HookResult {
    pub outcome: Option<HookOutcome>,
    /// Invocation directory, relative to the run directory.
    pub io_path: PathBuf,
    /// `output/final_payload.json`, when the hook wrote one (pre_llm_req).
    pub final_payload: Option<serde_json::Value>,
    /// `output/payload_override.dat`, when the hook wrote one.
    pub payload_override: Option<String>,
    pub control: Option<HookControl>,
}

impl HookResult {
    pub fn outcome(&self) -> HookOutcome {
        self.outcome.unwrap_or(HookOutcome::Failed)
    }

    /// Mark failed, dropping any half-read outputs.
    fn failed(mut self) -> Self {
        self.outcome = Some(HookOutcome::Failed);
        self.final_payload = None;
        self.payload_override = None;
        self.control = None;
        self
    }
}

/// Static context for hook invocations within one run.
pub struct HookExecutor<'a> {
    pub workspace_root: &'a Path,
    pub agent_home: &'a Path,
    pub paths: &'a RunPaths,
    pub run_id: &'a RunId,
}

impl HookExecutor<'_> {
    /// Invoke one hook. Never returns an error: every failure mode
    /// degrades to a FAILED audit outcome.
    pub async fn invoke(
        &self,
        kind: HookKind,
        def: &HookDef,
        step_index: u32,
        payload: HookPayload<'_>,
    ) -> HookResult {
        let ordinal = self.paths.next_hook_ordinal();
        let dir = self.paths.hook_dir(ordinal, kind.as_str());
        let io_path = dir
            .strip_prefix(self.paths.run_dir())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| dir.clone());

        let mut result = HookResult { io_path, ..Default::default() };

        if let Err(e) = self.write_inputs(&dir, kind, step_index, &payload) {
            tracing::warn!(hook = %kind, error = %e, "failed to stage hook input");
            return result.failed();
        }

        let argv: Vec<String> = def
            .command
            .iter()
            .map(|item| expand_path_vars(item, self.agent_home, self.workspace_root))
            .collect();
        if argv.is_empty() {
            return result.failed();
        }

        let spec = CommandSpec::new(argv.clone(), self.workspace_root)
            .env("DELTA_RUN_ID", self.run_id.as_str())
            .env("DELTA_HOOK_IO_PATH", dir.display().to_string())
            .timeout(Duration::from_millis(def.timeout_ms))
            .capture_limit(HOOK_CAPTURE_LIMIT);

        let captured = match run_command(spec).await {
            Ok(captured) => captured,
            Err(e) => {
                tracing::warn!(hook = %kind, error = %e, "hook spawn failed");
                let _ = std::fs::write(
                    dir.join("execution_meta").join("stderr.log"),
                    e.to_string(),
                );
                return result.failed();
            }
        };

        self.write_execution_meta(&dir, &argv, &captured);

        if captured.timed_out || captured.exit_code != Some(0) {
            tracing::debug!(
                hook = %kind,
                exit_code = ?captured.exit_code,
                timed_out = captured.timed_out,
                "hook failed"
            );
            return result.failed();
        }

        // Ingest outputs; a malformed file downgrades the whole invocation.
        match self.read_outputs(&dir, kind, &mut result) {
            Ok(()) => {
                result.outcome = Some(HookOutcome::Success);
                result
            }
            Err(e) => {
                tracing::warn!(hook = %kind, error = %e, "malformed hook output");
                result.failed()
            }
        }
    }

    fn write_inputs(
        &self,
        dir: &Path,
        kind: HookKind,
        step_index: u32,
        payload: &HookPayload<'_>,
    ) -> std::io::Result<()> {
        let input = dir.join("input");
        std::fs::create_dir_all(&input)?;
        std::fs::create_dir_all(dir.join("output"))?;
        std::fs::create_dir_all(dir.join("execution_meta"))?;

        let context = serde_json::json!({
            "hook_name": kind.as_str(),
            "step_index": step_index,
            "run_id": self.run_id.as_str(),
            "timestamp": now_iso_ms(),
        });
        std::fs::write(
            input.join("context.json"),
            serde_json::to_vec_pretty(&context).unwrap_or_default(),
        )?;

        match payload {
            HookPayload::Proposed(value) => std::fs::write(
                input.join("proposed_payload.json"),
                serde_json::to_vec_pretty(value).unwrap_or_default(),
            )?,
            HookPayload::Json(value) => std::fs::write(
                input.join("payload.json"),
                serde_json::to_vec_pretty(value).unwrap_or_default(),
            )?,
            HookPayload::Text(text) => std::fs::write(input.join("payload.dat"), text)?,
        }
        Ok(())
    }

    fn write_execution_meta(
        &self,
        dir: &Path,
        argv: &[String],
        captured: &delta_adapters::subprocess::CapturedOutput,
    ) {
        let meta = dir.join("execution_meta");
        let result: std::io::Result<()> = (|| {
            std::fs::write(meta.join("command.txt"), format!("{}\n", argv.join(" ")))?;
            std::fs::write(meta.join("stdout.log"), &captured.stdout)?;
            std::fs::write(meta.join("stderr.log"), &captured.stderr)?;
            let exit_text = match captured.exit_code {
                Some(code) => code.to_string(),
                None if captured.timed_out => "timeout".to_string(),
                None => "signal".to_string(),
            };
            std::fs::write(meta.join("exit_code.txt"), format!("{}\n", exit_text))?;
            std::fs::write(
                meta.join("duration_ms.txt"),
                format!("{}\n", captured.duration.as_millis()),
            )?;
            Ok(())
        })();
        if let Err(e) = result {
            tracing::warn!(dir = %meta.display(), error = %e, "failed to write hook execution meta");
        }
    }

    fn read_outputs(
        &self,
        dir: &Path,
        kind: HookKind,
        result: &mut HookResult,
    ) -> Result<(), serde_json::Error> {
        let output = dir.join("output");

        if kind == HookKind::PreLlmReq {
            if let Ok(bytes) = std::fs::read(output.join("final_payload.json")) {
                result.final_payload = Some(serde_json::from_slice(&bytes)?);
            }
        }
        if let Ok(text) = std::fs::read_to_string(output.join("payload_override.dat")) {
            result.payload_override = Some(text);
        }
        if let Ok(bytes) = std::fs::read(output.join("control.json")) {
            result.control = Some(serde_json::from_slice(&bytes)?);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
