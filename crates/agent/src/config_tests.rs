// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

const CONFIG: &str = r#"
name: greeter
llm:
  model: gpt-4.1
  temperature: 0.2
  max_tokens: 1024
tools:
  - name: greet
    exec: "echo Hello, ${name}!"
lifecycle_hooks:
  pre_llm_req:
    command: ["${AGENT_HOME}/hooks/rewrite.sh"]
    timeout_ms: 3000
"#;

fn write_agent(dir: &std::path::Path, config: &str) {
    std::fs::write(dir.join("config.yaml"), config).unwrap();
    std::fs::write(dir.join("system_prompt.md"), "You are a greeter.\n").unwrap();
}

#[test]
fn loads_a_complete_agent() {
    let dir = tempdir().unwrap();
    write_agent(dir.path(), CONFIG);

    let agent = Agent::load(dir.path()).unwrap();
    assert_eq!(agent.config.name, "greeter");
    assert_eq!(agent.config.llm.model, "gpt-4.1");
    assert_eq!(agent.config.max_iterations, DEFAULT_MAX_ITERATIONS);
    assert_eq!(agent.system_prompt, "You are a greeter.\n");
    assert_eq!(agent.tools.len(), 1);
    assert!(agent.tool("greet").is_some());
    assert_eq!(agent.fingerprint.len(), 64);

    let hook = agent.config.lifecycle_hooks.pre_llm_req.as_ref().unwrap();
    assert_eq!(hook.timeout_ms, 3000);
}

#[test]
fn missing_directory_fails() {
    let err = Agent::load(std::path::Path::new("/nonexistent/agent")).unwrap_err();
    assert!(matches!(err, AgentError::NotFound(_)));
}

#[test]
fn missing_config_fails_with_filename() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("system_prompt.md"), "x").unwrap();
    let err = Agent::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn missing_prompt_fails_with_filename() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("config.yaml"), CONFIG).unwrap();
    let err = Agent::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("system_prompt.md"));
}

#[test]
fn bad_tool_template_fails_at_load() {
    let dir = tempdir().unwrap();
    let config = r#"
name: broken
llm:
  model: gpt-4.1
tools:
  - name: count
    exec: "echo ${msg} | wc -c"
"#;
    write_agent(dir.path(), config);
    let err = Agent::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("use shell:"));
}

#[test]
fn context_yaml_overrides_inline_manifest() {
    let dir = tempdir().unwrap();
    let config = r#"
name: greeter
llm:
  model: gpt-4.1
context:
  sources:
    - type: journal
"#;
    write_agent(dir.path(), config);
    std::fs::write(
        dir.path().join("context.yaml"),
        "sources:\n  - type: journal\n    max_iterations: 2\n",
    )
    .unwrap();

    let agent = Agent::load(dir.path()).unwrap();
    assert_eq!(agent.manifest.sources.len(), 1);
    assert!(matches!(
        agent.manifest.sources[0],
        crate::context::ContextSource::Journal { max_iterations: Some(2) }
    ));
}

#[test]
fn fingerprint_tracks_config_bytes() {
    assert_eq!(fingerprint_bytes(b"a"), fingerprint_bytes(b"a"));
    assert_ne!(fingerprint_bytes(b"a"), fingerprint_bytes(b"b"));
}
