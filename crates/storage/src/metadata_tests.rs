// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use delta_core::id::RunId;
use delta_core::run::RunStatus;
use tempfile::tempdir;

fn sample() -> RunMetadata {
    RunMetadata {
        run_id: RunId::new("r1"),
        task: "task".to_string(),
        agent_ref: "/agents/a".into(),
        status: RunStatus::Running,
        pid: 99,
        hostname: "host".to_string(),
        process_name: "delta".to_string(),
        iterations_completed: 0,
        start_time_ms: 1000,
        updated_at_ms: 1000,
        error: None,
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let mut meta = sample();
    save_metadata(dir.path(), &mut meta).unwrap();

    let loaded = load_metadata(dir.path()).unwrap();
    assert_eq!(loaded, meta);
    assert!(loaded.updated_at_ms >= 1000);
}

#[test]
fn save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    save_metadata(dir.path(), &mut sample()).unwrap();
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![METADATA_FILE.to_string()]);
}

#[test]
fn update_mutates_in_place() {
    let dir = tempdir().unwrap();
    save_metadata(dir.path(), &mut sample()).unwrap();

    let updated = update_metadata(dir.path(), |m| {
        m.status = RunStatus::Interrupted;
        m.iterations_completed = 4;
    })
    .unwrap();
    assert_eq!(updated.status, RunStatus::Interrupted);

    let loaded = load_metadata(dir.path()).unwrap();
    assert_eq!(loaded.iterations_completed, 4);
}

#[test]
fn missing_metadata_reports_not_found() {
    let dir = tempdir().unwrap();
    assert!(matches!(load_metadata(dir.path()), Err(MetadataError::NotFound(_))));
}

#[test]
fn garbage_metadata_reports_invalid() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(METADATA_FILE), "not json").unwrap();
    assert!(matches!(load_metadata(dir.path()), Err(MetadataError::Invalid { .. })));
}
