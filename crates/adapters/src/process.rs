// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS process-table probes for the janitor.
//!
//! Liveness uses signal-0: `ESRCH` means dead, `EPERM` means something is
//! there but not ours (treated as alive; refusing cleanup is the safe
//! side). Process names come from `/proc/<pid>/comm` where available, with
//! a `ps` fallback elsewhere.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Whether a process with the given PID exists.
pub fn pid_alive(pid: u32) -> bool {
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Short command name for a PID, if it can be determined.
pub fn process_name(pid: u32) -> Option<String> {
    if let Ok(comm) = std::fs::read_to_string(format!("/proc/{}/comm", pid)) {
        let name = comm.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    // Non-Linux hosts: ask ps.
    let output = std::process::Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        return None;
    }
    // ps may print a full path.
    Some(
        name.rsplit('/')
            .next()
            .unwrap_or(name.as_str())
            .to_string(),
    )
}

/// Hostname of this machine.
pub fn current_hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown-host".to_string())
}

/// Short name of the current executable.
pub fn current_process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "delta".to_string())
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
