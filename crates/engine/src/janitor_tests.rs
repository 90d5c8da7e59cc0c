// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::EngineError;
use delta_core::id::RunId;
use delta_core::run::{RunMetadata, RunStatus};

fn running(pid: u32, hostname: &str, process_name: &str) -> RunMetadata {
    RunMetadata {
        run_id: RunId::new("r1"),
        task: "t".to_string(),
        agent_ref: "/a".into(),
        status: RunStatus::Running,
        pid,
        hostname: hostname.to_string(),
        process_name: process_name.to_string(),
        iterations_completed: 0,
        start_time_ms: 0,
        updated_at_ms: 0,
        error: None,
    }
}

#[test]
fn other_host_is_refused_without_force() {
    let meta = running(1, "some-other-host", "delta");
    match inspect(&meta, false) {
        Err(EngineError::RunningElsewhere { hostname, .. }) => {
            assert_eq!(hostname, "some-other-host");
        }
        other => panic!("expected RunningElsewhere, got {:?}", other),
    }
}

#[test]
fn other_host_with_force_is_reclaimed() {
    let meta = running(1, "some-other-host", "delta");
    match inspect(&meta, true) {
        Ok(JanitorDecision::Dead { reason }) => assert!(reason.contains("forced")),
        other => panic!("expected Dead, got {:?}", other),
    }
}

#[test]
fn dead_pid_is_reclaimed() {
    let host = delta_adapters::process::current_hostname();
    let meta = running(4_000_000, &host, "delta");
    match inspect(&meta, false) {
        Ok(JanitorDecision::Dead { reason }) => assert!(reason.contains("no longer exists")),
        other => panic!("expected Dead, got {:?}", other),
    }
}

#[test]
fn live_engine_process_is_refused() {
    // Our own pid, our own process name: the janitor must never reclaim it.
    let host = delta_adapters::process::current_hostname();
    let name = delta_adapters::process::current_process_name();
    let meta = running(std::process::id(), &host, &name);
    match inspect(&meta, false) {
        Err(EngineError::StillRunning { pid, .. }) => assert_eq!(pid, std::process::id()),
        other => panic!("expected StillRunning, got {:?}", other),
    }
}

#[test]
fn reused_pid_is_reclaimed() {
    // PID 1 is always alive and is never a delta engine.
    let host = delta_adapters::process::current_hostname();
    let meta = running(1, &host, "delta");
    match inspect(&meta, false) {
        Ok(JanitorDecision::Dead { reason }) => assert!(reason.contains("reused")),
        other => panic!("expected Dead (pid reuse), got {:?}", other),
    }
}
