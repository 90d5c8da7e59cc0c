// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tool expand` transparency specs.

use crate::prelude::*;

const CONFIG: &str = r#"
name: kitchen-sink
llm:
  model: test-model
tools:
  - name: greet
    exec: "echo Hello, ${name}!"
  - name: count
    shell: "echo ${msg} | wc -c"
  - name: save
    exec: "tee ${path}"
    stdin: content
"#;

#[test]
fn expands_all_three_forms() {
    let project = Project::empty();
    let config = project.file("agent/config.yaml", CONFIG);

    cli()
        .args(&["tool", "expand", config.to_str().unwrap()])
        .passes()
        .stdout_has("tool: greet")
        .stdout_has("source: exec")
        .stdout_has("- name (argument)")
        .stdout_has("tool: count")
        .stdout_has("source: shell")
        .stdout_has("tool: save")
        .stdout_has("- content (stdin)");
}

#[test]
fn accepts_an_agent_directory() {
    let project = Project::empty();
    project.file("agent/config.yaml", CONFIG);

    cli()
        .args(&["tool", "expand", project.path().join("agent").to_str().unwrap()])
        .passes()
        .stdout_has("tool: greet");
}

#[test]
fn json_output_is_machine_readable() {
    let project = Project::empty();
    let config = project.file("agent/config.yaml", CONFIG);

    let outcome = cli()
        .args(&["tool", "expand", config.to_str().unwrap(), "--json"])
        .passes();
    let tools: serde_json::Value = serde_json::from_str(&outcome.stdout).expect("json output");
    assert_eq!(tools[0]["name"], "greet");
    assert_eq!(tools[0]["command"][0], "echo");
    assert_eq!(tools[1]["command"][0], "sh");
}

#[test]
fn rejects_exec_templates_with_metacharacters() {
    let project = Project::empty();
    let config = project.file(
        "agent/config.yaml",
        "name: bad\nllm:\n  model: m\ntools:\n  - name: count\n    exec: \"echo ${msg} | wc -c\"\n",
    );

    cli()
        .args(&["tool", "expand", config.to_str().unwrap()])
        .fails(1)
        .stderr_has("use shell:");
}

#[test]
fn missing_config_is_an_error() {
    cli()
        .args(&["tool", "expand", "/nonexistent/config.yaml"])
        .fails(1)
        .stderr_has("cannot read");
}
