// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage and version output specs.

use crate::prelude::*;

#[test]
fn no_args_shows_usage() {
    cli().fails(2).stderr_has("Usage:");
}

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("continue")
        .stdout_has("list-runs")
        .stdout_has("tool");
}

#[test]
fn version_prints_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn continue_requires_run_id() {
    cli().args(&["continue"]).fails(2).stderr_has("--run-id");
}
