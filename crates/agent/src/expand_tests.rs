// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ToolConfigError;
use crate::tool::{InjectionMode, ToolSource};

fn entry_yaml(yaml: &str) -> RawToolEntry {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn exec_infers_positional_parameters() {
    let entry = entry_yaml(r#"{ name: greet, exec: "echo Hello, ${name}!" }"#);
    let tool = expand_tool(&entry).unwrap();

    assert_eq!(tool.command, vec!["echo", "Hello,", "${name}!"]);
    assert_eq!(tool.parameters.len(), 1);
    assert_eq!(tool.parameters[0].name, "name");
    assert_eq!(tool.parameters[0].inject, InjectionMode::Argument { position: None });
    assert_eq!(tool.source, Some(ToolSource::Exec("echo Hello, ${name}!".to_string())));
}

#[test]
fn exec_rejects_pipe() {
    let entry = entry_yaml(r#"{ name: count, exec: "echo ${msg} | wc -c" }"#);
    match expand_tool(&entry) {
        Err(ToolConfigError::MetacharacterInExec { meta, .. }) => assert_eq!(meta, "|"),
        other => panic!("expected metacharacter error, got {:?}", other),
    }
}

#[test]
fn exec_rejects_raw_modifier() {
    let entry = entry_yaml(r#"{ name: ls, exec: "ls ${flags:raw}" }"#);
    match expand_tool(&entry) {
        Err(ToolConfigError::RawInExec { param, .. }) => assert_eq!(param, "flags"),
        other => panic!("expected raw-in-exec error, got {:?}", other),
    }
}

#[test]
fn shell_rewrites_to_positional_parameters() {
    let entry = entry_yaml(r#"{ name: count, shell: "echo ${msg} | wc -c" }"#);
    let tool = expand_tool(&entry).unwrap();

    assert_eq!(tool.command, vec!["sh", "-c", "echo \"$1\" | wc -c", "--"]);
    assert_eq!(tool.parameters.len(), 1);
    assert_eq!(tool.parameters[0].name, "msg");
}

#[test]
fn shell_raw_omits_quotes() {
    let entry = entry_yaml(r#"{ name: ls, shell: "ls ${flags:raw} ${dir}" }"#);
    let tool = expand_tool(&entry).unwrap();
    assert_eq!(tool.command[2], "ls $1 \"$2\"");
    assert_eq!(tool.parameters[0].name, "flags");
    assert_eq!(tool.parameters[1].name, "dir");
}

#[test]
fn shell_repeated_placeholder_shares_position() {
    let entry = entry_yaml(r#"{ name: both, shell: "echo ${x} ${x}" }"#);
    let tool = expand_tool(&entry).unwrap();
    assert_eq!(tool.command[2], "echo \"$1\" \"$1\"");
    assert_eq!(tool.parameters.len(), 1);
}

#[test]
fn declared_description_merges_into_inferred_parameter() {
    let entry = entry_yaml(
        r#"
name: greet
exec: "echo ${name}"
parameters:
  - name: name
    description: Who to greet
"#,
    );
    let tool = expand_tool(&entry).unwrap();
    assert_eq!(tool.parameters[0].description.as_deref(), Some("Who to greet"));
}

#[test]
fn declaration_cannot_rename_parameters() {
    let entry = entry_yaml(
        r#"
name: greet
exec: "echo ${name}"
parameters:
  - name: other
"#,
    );
    match expand_tool(&entry) {
        Err(ToolConfigError::UnknownDeclaredParameter { param, .. }) => assert_eq!(param, "other"),
        other => panic!("expected unknown-parameter error, got {:?}", other),
    }
}

#[test]
fn stdin_key_adds_parameter() {
    let entry = entry_yaml(r#"{ name: save, exec: "tee ${path}", stdin: content }"#);
    let tool = expand_tool(&entry).unwrap();
    assert_eq!(tool.parameters.len(), 2);
    assert_eq!(tool.parameters[1].name, "content");
    assert_eq!(tool.parameters[1].inject, InjectionMode::Stdin);
}

#[test]
fn stdin_cannot_shadow_template_placeholder() {
    let entry = entry_yaml(r#"{ name: save, exec: "tee ${path}", stdin: path }"#);
    assert!(matches!(
        expand_tool(&entry),
        Err(ToolConfigError::StdinParameterInTemplate { .. })
    ));
}

#[test]
fn legacy_command_form_with_modes() {
    let entry = entry_yaml(
        r#"
name: commit
command: [git, commit]
parameters:
  - name: message
    inject_as: option
    option_name: -m
  - name: body
    inject_as: stdin
"#,
    );
    let tool = expand_tool(&entry).unwrap();
    assert_eq!(tool.command, vec!["git", "commit"]);
    assert_eq!(tool.parameters[0].inject, InjectionMode::Option { flag: "-m".to_string() });
    assert_eq!(tool.parameters[1].inject, InjectionMode::Stdin);
    assert_eq!(tool.source, None);
}

#[test]
fn legacy_option_requires_flag_name() {
    let entry = entry_yaml(
        r#"
name: commit
command: [git, commit]
parameters:
  - name: message
    inject_as: option
"#,
    );
    assert!(matches!(expand_tool(&entry), Err(ToolConfigError::MissingOptionName { .. })));
}

#[test]
fn two_stdin_parameters_rejected() {
    let entry = entry_yaml(
        r#"
name: bad
command: [cat]
parameters:
  - name: a
    inject_as: stdin
  - name: b
    inject_as: stdin
"#,
    );
    assert!(matches!(expand_tool(&entry), Err(ToolConfigError::MultipleStdinParameters { .. })));
}

#[test]
fn exactly_one_form_required() {
    let entry = entry_yaml(r#"{ name: odd, exec: "echo hi", shell: "echo hi" }"#);
    assert!(matches!(expand_tool(&entry), Err(ToolConfigError::AmbiguousForm { .. })));

    let entry = entry_yaml(r#"{ name: none }"#);
    assert!(matches!(expand_tool(&entry), Err(ToolConfigError::AmbiguousForm { .. })));
}

#[test]
fn ask_human_name_is_reserved() {
    let entries = vec![entry_yaml(r#"{ name: ask_human, exec: "echo hi" }"#)];
    assert!(matches!(expand_tools(&entries), Err(ToolConfigError::ReservedName { .. })));
}

#[test]
fn duplicate_tool_names_rejected() {
    let entries = vec![
        entry_yaml(r#"{ name: greet, exec: "echo a" }"#),
        entry_yaml(r#"{ name: greet, exec: "echo b" }"#),
    ];
    assert!(matches!(expand_tools(&entries), Err(ToolConfigError::DuplicateTool { .. })));
}
