// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for CLI specs.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// A scratch workspace directory for one spec.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(&path, contents).expect("write");
        path
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        std::fs::read(self.dir.path().join(rel)).expect("read")
    }

    /// Seed a run directory with plausible persisted state.
    pub fn seed_run(&self, run_id: &str, status: &str, start_ms: u64) {
        let run_dir = format!(".delta/{}", run_id);
        self.file(
            &format!("{}/journal.jsonl", run_dir),
            &format!(
                "{}\n{}\n",
                serde_json::json!({
                    "seq": 1,
                    "ts": "2026-08-01T00:00:00.000Z",
                    "type": "RUN_START",
                    "task": "seeded task",
                    "agent_ref": "/agents/seeded",
                    "config_fingerprint": "0000",
                }),
                serde_json::json!({
                    "seq": 2,
                    "ts": "2026-08-01T00:00:00.001Z",
                    "type": "USER_MESSAGE",
                    "content": "seeded task",
                }),
            ),
        );
        self.file(
            &format!("{}/metadata.json", run_dir),
            &serde_json::json!({
                "run_id": run_id,
                "task": "seeded task",
                "agent_ref": "/agents/seeded",
                "status": status,
                "pid": 1,
                "hostname": "spec-host",
                "process_name": "delta",
                "iterations_completed": 1,
                "start_time_ms": start_ms,
                "updated_at_ms": start_ms,
            })
            .to_string(),
        );
    }

    /// Write a minimal agent directory and return its path.
    pub fn agent(&self, name: &str) -> PathBuf {
        let dir = format!("agents/{}", name);
        self.file(
            &format!("{}/config.yaml", dir),
            "name: spec-agent\nllm:\n  model: test-model\ntools:\n  - name: greet\n    exec: \"echo Hello, ${name}!\"\n",
        );
        self.file(&format!("{}/system_prompt.md", dir), "You are a spec agent.\n");
        self.dir.path().join(dir)
    }
}

/// Builder for one invocation of the compiled binary.
pub struct Spec {
    cmd: Command,
}

/// Command against the compiled binary, with a clean LLM environment.
pub fn cli() -> Spec {
    let mut cmd = Command::cargo_bin("delta").expect("delta binary");
    cmd.env_remove("DELTA_API_URL");
    cmd.env_remove("DELTA_API_KEY");
    Spec { cmd }
}

/// Same, but with a dead-end endpoint configured; commands that stop
/// before the first LLM call never contact it.
pub fn cli_with_endpoint() -> Spec {
    let mut spec = cli();
    spec.cmd.env("DELTA_API_URL", "http://127.0.0.1:9/never-contacted");
    spec
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn passes(self) -> Outcome {
        let outcome = self.outcome();
        assert_eq!(outcome.code, 0, "expected success, got {:?}", outcome);
        outcome
    }

    pub fn fails(self, code: i32) -> Outcome {
        let outcome = self.outcome();
        assert_eq!(outcome.code, code, "unexpected exit code, got {:?}", outcome);
        outcome
    }

    fn outcome(mut self) -> Outcome {
        let output = self.cmd.output().expect("spawn delta");
        Outcome {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Captured process result with containment assertions.
#[derive(Debug)]
pub struct Outcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly contains {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }
}
