// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use delta_adapters::FakeLlm;
use delta_core::event::JournalEntry;
use delta_core::id::RunId;
use delta_storage::Journal;
use std::path::Path;

use crate::lifecycle::{start_new_run, StartOptions};
use crate::scheduler::{Engine, RunOutcome};
use crate::session::RunSession;
use crate::signal::SignalWatcher;

/// Minimal agent: one exec tool, no hooks.
pub const GREETER_CONFIG: &str = r#"
name: greeter
llm:
  model: test-model
tools:
  - name: greet
    exec: "echo Hello, ${name}!"
"#;

pub fn write_agent(dir: &Path, config_yaml: &str) {
    std::fs::write(dir.join("config.yaml"), config_yaml).unwrap();
    std::fs::write(dir.join("system_prompt.md"), "You are a test agent.\n").unwrap();
}

/// Write an executable hook script and return its path as a string.
pub fn write_script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

pub fn start(agent_dir: &Path, workspace_dir: &Path, task: &str, run_id: Option<&str>) -> RunSession {
    start_new_run(StartOptions {
        agent_dir: agent_dir.to_path_buf(),
        workspace_dir: workspace_dir.to_path_buf(),
        task: task.to_string(),
        run_id: run_id.map(RunId::new),
    })
    .unwrap()
}

pub async fn drive(llm: FakeLlm, session: RunSession) -> RunOutcome {
    Engine::new(llm, session, SignalWatcher::disabled(), false)
        .run()
        .await
        .unwrap()
}

pub fn read_journal(workspace_dir: &Path, run_id: &RunId) -> Vec<JournalEntry> {
    let run_dir = workspace_dir
        .canonicalize()
        .unwrap()
        .join(".delta")
        .join(run_id.as_str());
    Journal::read_path(&run_dir).unwrap()
}

pub fn kinds(entries: &[JournalEntry]) -> Vec<&'static str> {
    entries.iter().map(|e| e.event.kind()).collect()
}
