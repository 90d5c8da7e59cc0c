// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with bounded capture and graceful timeouts.
//!
//! Tools, hooks, and computed context sources all run through
//! [`run_command`]. Stdout and stderr are drained concurrently into
//! tail-retaining buffers so a chatty child can never grow engine memory
//! unboundedly. On timeout the child gets SIGTERM, a one-second grace
//! period, then SIGKILL.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Default per-tool timeout.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Default capture cap per stream (tools).
pub const DEFAULT_CAPTURE_LIMIT: usize = 256 * 1024;

/// Grace period between SIGTERM and SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Errors spawning or supervising a child process.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error while supervising child: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty argv")]
    EmptyArgv,
}

/// One command to run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    /// Extra environment on top of the inherited one.
    pub envs: Vec<(String, String)>,
    /// Bytes fed to stdin; stdin is closed immediately when `None`.
    pub stdin: Option<Vec<u8>>,
    pub timeout: Duration,
    /// Capture cap per stream; the tail is retained on overflow.
    pub capture_limit: usize,
}

impl CommandSpec {
    pub fn new(argv: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            cwd: cwd.into(),
            envs: Vec::new(),
            stdin: None,
            timeout: DEFAULT_TOOL_TIMEOUT,
            capture_limit: DEFAULT_CAPTURE_LIMIT,
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn stdin_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.stdin = Some(bytes);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capture_limit(mut self, limit: usize) -> Self {
        self.capture_limit = limit;
        self
    }
}

/// What came back from a finished (or killed) child.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// `None` when the child died to a signal (including our SIGKILL).
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
    /// Total bytes the child wrote, including any discarded prefix.
    pub stdout_total: u64,
    pub stderr_total: u64,
    pub timed_out: bool,
    pub duration: Duration,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn truncated(&self) -> bool {
        self.stdout_truncated || self.stderr_truncated
    }
}

/// Buffer that keeps at most `limit` bytes, discarding from the front.
struct TailBuffer {
    limit: usize,
    data: Vec<u8>,
    truncated: bool,
    total: u64,
}

impl TailBuffer {
    fn new(limit: usize) -> Self {
        Self { limit, data: Vec::new(), truncated: false, total: 0 }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.total += chunk.len() as u64;
        self.data.extend_from_slice(chunk);
        if self.data.len() > self.limit {
            let excess = self.data.len() - self.limit;
            self.data.drain(..excess);
            self.truncated = true;
        }
    }
}

async fn drain(
    mut stream: impl AsyncReadExt + Unpin,
    limit: usize,
) -> Result<TailBuffer, std::io::Error> {
    let mut buffer = TailBuffer::new(limit);
    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.push(&chunk[..n]);
    }
    Ok(buffer)
}

/// Run a command to completion, capturing both streams.
pub async fn run_command(spec: CommandSpec) -> Result<CapturedOutput, SpawnError> {
    let program = spec.argv.first().ok_or(SpawnError::EmptyArgv)?.clone();

    let mut cmd = Command::new(&program);
    cmd.args(&spec.argv[1..])
        .current_dir(&spec.cwd)
        .stdin(if spec.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in &spec.envs {
        cmd.env(key, value);
    }

    let started = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|source| SpawnError::Spawn { program: program.clone(), source })?;

    if let (Some(bytes), Some(mut sink)) = (spec.stdin.clone(), child.stdin.take()) {
        // A child that never reads stdin must not wedge the engine; the
        // write is fire-and-forget.
        tokio::spawn(async move {
            let _ = sink.write_all(&bytes).await;
            let _ = sink.shutdown().await;
        });
    }

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let limit = spec.capture_limit;
    let stdout_task = tokio::spawn(async move {
        match stdout {
            Some(stream) => drain(stream, limit).await,
            None => Ok(TailBuffer::new(limit)),
        }
    });
    let stderr_task = tokio::spawn(async move {
        match stderr {
            Some(stream) => drain(stream, limit).await,
            None => Ok(TailBuffer::new(limit)),
        }
    });

    let mut timed_out = false;
    let status = match tokio::time::timeout(spec.timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            timed_out = true;
            tracing::warn!(
                program = %program,
                timeout_s = spec.timeout.as_secs(),
                "child timed out; sending SIGTERM"
            );
            signal_child(&child, Signal::SIGTERM);
            match tokio::time::timeout(KILL_GRACE, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    signal_child(&child, Signal::SIGKILL);
                    child.wait().await?
                }
            }
        }
    };

    let stdout_buf = stdout_task.await.map_err(|e| {
        SpawnError::Io(std::io::Error::other(e))
    })??;
    let stderr_buf = stderr_task.await.map_err(|e| {
        SpawnError::Io(std::io::Error::other(e))
    })??;

    Ok(CapturedOutput {
        exit_code: status.code(),
        stdout: stdout_buf.data,
        stderr: stderr_buf.data,
        stdout_truncated: stdout_buf.truncated,
        stderr_truncated: stderr_buf.truncated,
        stdout_total: stdout_buf.total,
        stderr_total: stderr_buf.total,
        timed_out,
        duration: started.elapsed(),
    })
}

fn signal_child(child: &tokio::process::Child, signal: Signal) {
    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), signal);
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
