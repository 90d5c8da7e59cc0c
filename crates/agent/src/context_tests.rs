// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn manifest_yaml_parses_all_variants() {
    let yaml = r#"
sources:
  - type: file
    path: "${AGENT_HOME}/system_prompt.md"
    on_missing: error
  - type: computed_file
    command: [git, status, --short]
    on_error: insert
  - type: journal
    max_iterations: 5
"#;
    let manifest: ContextManifest = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(manifest.sources.len(), 3);

    match &manifest.sources[0] {
        ContextSource::File { role, on_missing, .. } => {
            assert_eq!(*role, SourceRole::System);
            assert_eq!(*on_missing, OnMissing::Error);
        }
        other => panic!("expected file source, got {:?}", other),
    }
    match &manifest.sources[1] {
        ContextSource::ComputedFile { role, on_error, max_bytes, .. } => {
            assert_eq!(*role, SourceRole::User);
            assert_eq!(*on_error, OnError::Insert);
            assert_eq!(*max_bytes, 1024 * 1024);
        }
        other => panic!("expected computed_file source, got {:?}", other),
    }
    match &manifest.sources[2] {
        ContextSource::Journal { max_iterations } => assert_eq!(*max_iterations, Some(5)),
        other => panic!("expected journal source, got {:?}", other),
    }
}

#[test]
fn default_manifest_is_prompt_then_journal() {
    let manifest = ContextManifest::default_manifest();
    assert_eq!(manifest.sources.len(), 2);
    assert!(matches!(
        &manifest.sources[0],
        ContextSource::File { on_missing: OnMissing::Error, .. }
    ));
    assert!(matches!(&manifest.sources[1], ContextSource::Journal { max_iterations: None }));
}
