// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `list-runs` enumeration and filtering specs.

use crate::prelude::*;

#[test]
fn empty_workspace_lists_nothing() {
    let project = Project::empty();
    cli()
        .args(&["list-runs"])
        .cwd(project.path())
        .passes()
        .stdout_has("no runs");
}

#[test]
fn runs_are_listed_newest_first() {
    let project = Project::empty();
    project.seed_run("older", "COMPLETED", 1_000);
    project.seed_run("newer", "FAILED", 2_000);

    let outcome = cli()
        .args(&["list-runs", "--format", "raw"])
        .cwd(project.path())
        .passes();
    assert_eq!(outcome.stdout, "newer\nolder\n");
}

#[test]
fn status_filter_narrows_output() {
    let project = Project::empty();
    project.seed_run("good", "COMPLETED", 1_000);
    project.seed_run("bad", "FAILED", 2_000);

    cli()
        .args(&["list-runs", "--status", "failed", "--format", "raw"])
        .cwd(project.path())
        .passes()
        .stdout_has("bad")
        .stdout_lacks("good");
}

#[test]
fn resumable_filter_keeps_waiting_and_interrupted() {
    let project = Project::empty();
    project.seed_run("done", "COMPLETED", 1_000);
    project.seed_run("parked", "WAITING_FOR_INPUT", 2_000);
    project.seed_run("stopped", "INTERRUPTED", 3_000);

    let outcome = cli()
        .args(&["list-runs", "--resumable", "--format", "raw"])
        .cwd(project.path())
        .passes();
    assert_eq!(outcome.stdout, "stopped\nparked\n");
}

#[test]
fn first_takes_only_the_newest() {
    let project = Project::empty();
    project.seed_run("older", "COMPLETED", 1_000);
    project.seed_run("newer", "COMPLETED", 2_000);

    let outcome = cli()
        .args(&["list-runs", "--first", "--format", "raw"])
        .cwd(project.path())
        .passes();
    assert_eq!(outcome.stdout, "newer\n");
}

#[test]
fn json_format_carries_full_metadata() {
    let project = Project::empty();
    project.seed_run("abc", "INTERRUPTED", 1_000);

    let outcome = cli()
        .args(&["list-runs", "--format", "json"])
        .cwd(project.path())
        .passes();
    let parsed: serde_json::Value = serde_json::from_str(&outcome.stdout).expect("json output");
    assert_eq!(parsed[0]["run_id"], "abc");
    assert_eq!(parsed[0]["status"], "INTERRUPTED");
    assert_eq!(parsed[0]["task"], "seeded task");
}

#[test]
fn bogus_status_filter_is_an_error() {
    let project = Project::empty();
    cli()
        .args(&["list-runs", "--status", "bogus"])
        .cwd(project.path())
        .fails(1)
        .stderr_has("unknown run status");
}
