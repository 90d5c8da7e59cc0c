// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::write_script;
use delta_agent::hook::{HookDef, HookKind};
use delta_core::event::HookOutcome;
use delta_core::id::RunId;
use tempfile::tempdir;

struct Fixture {
    _ws: tempfile::TempDir,
    _run: tempfile::TempDir,
    _agent: tempfile::TempDir,
    ws_path: std::path::PathBuf,
    run_path: std::path::PathBuf,
    agent_path: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let ws = tempdir().unwrap();
    let run = tempdir().unwrap();
    let agent = tempdir().unwrap();
    let ws_path = ws.path().to_path_buf();
    let run_path = run.path().to_path_buf();
    let agent_path = agent.path().to_path_buf();
    Fixture { _ws: ws, _run: run, _agent: agent, ws_path, run_path, agent_path }
}

async fn invoke(fx: &Fixture, def: &HookDef, kind: HookKind, payload: HookPayload<'_>) -> HookResult {
    let paths = delta_storage::RunPaths::new(&fx.run_path);
    let run_id = RunId::new("r1");
    let executor = HookExecutor {
        workspace_root: &fx.ws_path,
        agent_home: &fx.agent_path,
        paths: &paths,
        run_id: &run_id,
    };
    executor.invoke(kind, def, 1, payload).await
}

fn def(command: Vec<String>) -> HookDef {
    HookDef { command, timeout_ms: 5000 }
}

#[tokio::test]
async fn successful_hook_records_meta_and_inputs() {
    let fx = fixture();
    let script = write_script(
        &fx.agent_path,
        "ok.sh",
        "#!/bin/sh\necho hook ran\nexit 0\n",
    );
    let payload = serde_json::json!({"model": "m"});

    let result = invoke(&fx, &def(vec![script]), HookKind::PreLlmReq, HookPayload::Proposed(&payload)).await;
    assert_eq!(result.outcome(), HookOutcome::Success);

    let dir = fx.run_path.join(&result.io_path);
    assert!(dir.join("input/context.json").exists());
    assert!(dir.join("input/proposed_payload.json").exists());
    assert_eq!(
        std::fs::read_to_string(dir.join("execution_meta/stdout.log")).unwrap(),
        "hook ran\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.join("execution_meta/exit_code.txt")).unwrap().trim(),
        "0"
    );

    let context: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("input/context.json")).unwrap()).unwrap();
    assert_eq!(context["hook_name"], "pre_llm_req");
    assert_eq!(context["run_id"], "r1");
}

#[tokio::test]
async fn hook_sees_io_path_and_run_id_env() {
    let fx = fixture();
    let script = write_script(
        &fx.agent_path,
        "env.sh",
        r#"#!/bin/sh
printf '%s' "$DELTA_RUN_ID" > "$DELTA_HOOK_IO_PATH/output/payload_override.dat"
"#,
    );

    let result = invoke(&fx, &def(vec![script]), HookKind::PostToolExec, HookPayload::Text("x")).await;
    assert_eq!(result.outcome(), HookOutcome::Success);
    assert_eq!(result.payload_override.as_deref(), Some("r1"));
}

#[tokio::test]
async fn agent_home_is_substituted_in_command() {
    let fx = fixture();
    write_script(&fx.agent_path, "homed.sh", "#!/bin/sh\nexit 0\n");

    let result = invoke(
        &fx,
        &def(vec!["${AGENT_HOME}/homed.sh".to_string()]),
        HookKind::PostLlmResp,
        HookPayload::Text("x"),
    )
    .await;
    assert_eq!(result.outcome(), HookOutcome::Success);
}

#[tokio::test]
async fn nonzero_exit_is_failed_and_outputs_ignored() {
    let fx = fixture();
    let script = write_script(
        &fx.agent_path,
        "fail.sh",
        r#"#!/bin/sh
echo '{"skip": true}' > "$DELTA_HOOK_IO_PATH/output/control.json"
exit 1
"#,
    );

    let result = invoke(&fx, &def(vec![script]), HookKind::PreToolExec, HookPayload::Text("x")).await;
    assert_eq!(result.outcome(), HookOutcome::Failed);
    assert!(result.control.is_none(), "outputs of failing hooks must be ignored");
}

#[tokio::test]
async fn malformed_control_json_downgrades_to_failed() {
    let fx = fixture();
    let script = write_script(
        &fx.agent_path,
        "bad.sh",
        r#"#!/bin/sh
echo '{not json' > "$DELTA_HOOK_IO_PATH/output/control.json"
"#,
    );

    let result = invoke(&fx, &def(vec![script]), HookKind::PreToolExec, HookPayload::Text("x")).await;
    assert_eq!(result.outcome(), HookOutcome::Failed);
    assert!(result.control.is_none());
}

#[tokio::test]
async fn timeout_is_failed() {
    let fx = fixture();
    let hook = HookDef { command: vec!["sleep".to_string(), "30".to_string()], timeout_ms: 100 };

    let started = std::time::Instant::now();
    let result = invoke(&fx, &hook, HookKind::PostLlmResp, HookPayload::Text("x")).await;
    assert_eq!(result.outcome(), HookOutcome::Failed);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}

#[tokio::test]
async fn invocation_directories_are_numbered() {
    let fx = fixture();
    let script = write_script(&fx.agent_path, "ok.sh", "#!/bin/sh\nexit 0\n");

    let first = invoke(&fx, &def(vec![script.clone()]), HookKind::PreLlmReq, HookPayload::Text("a")).await;
    let second = invoke(&fx, &def(vec![script]), HookKind::PostLlmResp, HookPayload::Text("b")).await;

    assert_eq!(first.io_path, std::path::Path::new("runtime_io/hooks/001_pre_llm_req"));
    assert_eq!(second.io_path, std::path::Path::new("runtime_io/hooks/002_post_llm_resp"));
}

#[tokio::test]
async fn control_json_round_trips() {
    let fx = fixture();
    let script = write_script(
        &fx.agent_path,
        "control.sh",
        r#"#!/bin/sh
cat > "$DELTA_HOOK_IO_PATH/output/control.json" <<'EOF'
{"skip": true, "observation": "blocked", "override_args": {"name": "Bob"}, "escalate": false}
EOF
"#,
    );

    let result = invoke(&fx, &def(vec![script]), HookKind::PreToolExec, HookPayload::Text("x")).await;
    let control = result.control.expect("control parsed");
    assert!(control.skip);
    assert_eq!(control.observation.as_deref(), Some("blocked"));
    assert_eq!(
        control.override_args.unwrap().get("name").and_then(|v| v.as_str()),
        Some("Bob")
    );
    assert!(!control.escalate);
}
