// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start-up consistency specs: errors that must leave state untouched.

use crate::prelude::*;

#[test]
fn run_without_task_is_an_error() {
    let project = Project::empty();
    let agent = project.agent("greeter");
    cli_with_endpoint()
        .args(&["run", "--agent", agent.to_str().unwrap()])
        .cwd(project.path())
        .fails(1)
        .stderr_has("--task");
}

#[test]
fn run_without_endpoint_config_is_an_error() {
    let project = Project::empty();
    let agent = project.agent("greeter");
    cli()
        .args(&["run", "--agent", agent.to_str().unwrap(), "-m", "go"])
        .cwd(project.path())
        .fails(1)
        .stderr_has("DELTA_API_URL");
}

#[test]
fn run_with_missing_agent_dir_is_an_error() {
    let project = Project::empty();
    cli_with_endpoint()
        .args(&["run", "--agent", "/nonexistent/agent", "-m", "go"])
        .cwd(project.path())
        .fails(1)
        .stderr_has("agent directory not found");
}

#[test]
fn duplicate_run_id_fails_and_preserves_original_bytes() {
    let project = Project::empty();
    let agent = project.agent("greeter");
    project.seed_run("abc-123", "COMPLETED", 1_000);

    let journal_before = project.read(".delta/abc-123/journal.jsonl");
    let metadata_before = project.read(".delta/abc-123/metadata.json");

    cli_with_endpoint()
        .args(&[
            "run",
            "--agent",
            agent.to_str().unwrap(),
            "--run-id",
            "abc-123",
            "-m",
            "other",
        ])
        .cwd(project.path())
        .fails(1)
        .stderr_has("already exists")
        .stderr_has("abc-123");

    assert_eq!(project.read(".delta/abc-123/journal.jsonl"), journal_before);
    assert_eq!(project.read(".delta/abc-123/metadata.json"), metadata_before);
}

#[test]
fn continue_of_unknown_run_is_an_error() {
    let project = Project::empty();
    cli_with_endpoint()
        .args(&["continue", "--run-id", "ghost"])
        .cwd(project.path())
        .fails(1)
        .stderr_has("ghost")
        .stderr_has("not found");
}

#[test]
fn continue_of_terminal_run_is_an_error() {
    let project = Project::empty();
    project.seed_run("done-run", "COMPLETED", 1_000);
    cli_with_endpoint()
        .args(&["continue", "--run-id", "done-run"])
        .cwd(project.path())
        .fails(1)
        .stderr_has("cannot be resumed");
}
