// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tempfile::tempdir;

fn spec(argv: &[&str], cwd: &std::path::Path) -> CommandSpec {
    CommandSpec::new(argv.iter().map(|s| s.to_string()).collect(), cwd)
}

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let dir = tempdir().unwrap();
    let out = run_command(spec(&["echo", "hello"], dir.path())).await.unwrap();

    assert_eq!(out.exit_code, Some(0));
    assert_eq!(out.stdout_lossy(), "hello\n");
    assert!(out.stderr.is_empty());
    assert!(!out.truncated());
    assert!(out.success());
}

#[tokio::test]
async fn runs_in_the_given_cwd() {
    let dir = tempdir().unwrap();
    let out = run_command(spec(&["pwd"], dir.path())).await.unwrap();
    let reported = out.stdout_lossy();
    let canonical = dir.path().canonicalize().unwrap();
    assert_eq!(reported.trim(), canonical.to_string_lossy());
}

#[tokio::test]
async fn nonzero_exit_is_captured_not_an_error() {
    let dir = tempdir().unwrap();
    let out = run_command(spec(&["sh", "-c", "echo oops >&2; exit 3"], dir.path()))
        .await
        .unwrap();
    assert_eq!(out.exit_code, Some(3));
    assert_eq!(out.stderr_lossy(), "oops\n");
    assert!(!out.success());
}

#[tokio::test]
async fn stdin_bytes_reach_the_child() {
    let dir = tempdir().unwrap();
    let out = run_command(spec(&["cat"], dir.path()).stdin_bytes(b"fed via stdin".to_vec()))
        .await
        .unwrap();
    assert_eq!(out.stdout_lossy(), "fed via stdin");
}

#[tokio::test]
async fn overflow_keeps_the_tail() {
    let dir = tempdir().unwrap();
    let out = run_command(
        spec(&["sh", "-c", "printf 'aaaaaaaaaa'; printf 'bbbbb'"], dir.path())
            .capture_limit(5),
    )
    .await
    .unwrap();
    assert!(out.stdout_truncated);
    assert_eq!(out.stdout_lossy(), "bbbbb");
}

#[tokio::test]
async fn timeout_terminates_the_child() {
    let dir = tempdir().unwrap();
    let started = std::time::Instant::now();
    let out = run_command(
        spec(&["sleep", "30"], dir.path()).timeout(Duration::from_millis(200)),
    )
    .await
    .unwrap();

    assert!(out.timed_out);
    assert!(!out.success());
    // SIGTERM is enough for sleep; well under the 30s the child wanted.
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let dir = tempdir().unwrap();
    let err = run_command(spec(&["definitely-not-a-binary-xyz"], dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, SpawnError::Spawn { .. }));
}

#[tokio::test]
async fn extra_env_is_visible() {
    let dir = tempdir().unwrap();
    let out = run_command(
        spec(&["sh", "-c", "printf '%s' \"$DELTA_RUN_ID\""], dir.path())
            .env("DELTA_RUN_ID", "r-42"),
    )
    .await
    .unwrap();
    assert_eq!(out.stdout_lossy(), "r-42");
}
