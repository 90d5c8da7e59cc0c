// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expansion of config tool entries into internal definitions.
//!
//! Two simplified syntaxes exist, both preserving the argv safety model:
//!
//! - `exec:` is tokenized without shell interpretation; `${name}`
//!   placeholders become argv text. Shell metacharacters are rejected at
//!   load time.
//! - `shell:` is a script body run under `sh -c` with placeholders rewritten
//!   to quoted positional parameters (`"$1"`); values travel as argv after
//!   `--`, never via string interpolation. `${name:raw}` omits the quotes
//!   for trusted operator-supplied fragments.
//!
//! The explicit `command:` + `parameters:` form remains for tools that need
//! option or fixed-position injection.

use serde::Deserialize;

use crate::error::ToolConfigError;
use crate::lex::{self, LexError};
use crate::template;
use crate::tool::{InjectionMode, ToolDefinition, ToolParameter, ToolSource, ASK_HUMAN};

/// Tool entry as written in `config.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToolEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exec: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub command: Option<Vec<String>>,
    /// Name of a parameter injected via standard input.
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

/// Parameter declaration as written in `config.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Structural type; informational only (the core model is string).
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,
    /// Legacy-form injection mode: `argument` (default), `option`, `stdin`.
    #[serde(default)]
    pub inject_as: Option<String>,
    #[serde(default)]
    pub option_name: Option<String>,
    #[serde(default)]
    pub position: Option<usize>,
}

/// Expand all tool entries, rejecting duplicates and the reserved name.
pub fn expand_tools(entries: &[RawToolEntry]) -> Result<Vec<ToolDefinition>, ToolConfigError> {
    let mut seen = std::collections::HashSet::new();
    let mut tools = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.name == ASK_HUMAN {
            return Err(ToolConfigError::ReservedName {
                tool: entry.name.clone(),
                name: ASK_HUMAN.to_string(),
            });
        }
        if !seen.insert(entry.name.clone()) {
            return Err(ToolConfigError::DuplicateTool { tool: entry.name.clone() });
        }
        tools.push(expand_tool(entry)?);
    }
    Ok(tools)
}

/// Expand one entry, checking the three forms in order.
pub fn expand_tool(entry: &RawToolEntry) -> Result<ToolDefinition, ToolConfigError> {
    let forms =
        usize::from(entry.exec.is_some()) + usize::from(entry.shell.is_some()) + usize::from(entry.command.is_some());
    if forms != 1 {
        return Err(ToolConfigError::AmbiguousForm { tool: entry.name.clone() });
    }

    if let Some(template) = &entry.exec {
        expand_exec(entry, template)
    } else if let Some(template) = &entry.shell {
        expand_shell(entry, template)
    } else {
        expand_command(entry)
    }
}

fn expand_exec(entry: &RawToolEntry, raw: &str) -> Result<ToolDefinition, ToolConfigError> {
    let tool = entry.name.clone();

    for ph in template::placeholders(raw) {
        if ph.raw {
            return Err(ToolConfigError::RawInExec { tool: tool.clone(), param: ph.name });
        }
    }

    let tokens = lex::split(raw).map_err(|e| match e {
        LexError::UnterminatedQuote => ToolConfigError::UnterminatedQuote { tool: tool.clone() },
        LexError::Metacharacter(meta) => {
            ToolConfigError::MetacharacterInExec { tool: tool.clone(), meta }
        }
    })?;
    if tokens.is_empty() {
        return Err(ToolConfigError::EmptyTemplate { tool });
    }

    // Infer one argument-mode parameter per distinct placeholder, in order
    // of first appearance.
    let mut parameters: Vec<ToolParameter> = Vec::new();
    for token in &tokens {
        for ph in template::placeholders(token) {
            if !parameters.iter().any(|p| p.name == ph.name) {
                parameters.push(ToolParameter {
                    name: ph.name,
                    description: None,
                    inject: InjectionMode::Argument { position: None },
                });
            }
        }
    }

    merge_declarations(entry, &mut parameters)?;

    Ok(ToolDefinition {
        name: entry.name.clone(),
        description: entry.description.clone(),
        command: tokens,
        parameters,
        source: Some(ToolSource::Exec(raw.to_string())),
    })
}

fn expand_shell(entry: &RawToolEntry, raw: &str) -> Result<ToolDefinition, ToolConfigError> {
    if raw.trim().is_empty() {
        return Err(ToolConfigError::EmptyTemplate { tool: entry.name.clone() });
    }

    // Distinct placeholder names, in order of first appearance, become the
    // positional parameters $1..$n.
    let mut order: Vec<String> = Vec::new();
    for ph in template::placeholders(raw) {
        if !order.contains(&ph.name) {
            order.push(ph.name);
        }
    }

    let script = template::substitute(raw, |ph| {
        order.iter().position(|n| n == &ph.name).map(|idx| {
            if ph.raw {
                format!("${}", idx + 1)
            } else {
                format!("\"${}\"", idx + 1)
            }
        })
    });

    let mut parameters: Vec<ToolParameter> = order
        .into_iter()
        .map(|name| ToolParameter {
            name,
            description: None,
            inject: InjectionMode::Argument { position: None },
        })
        .collect();

    merge_declarations(entry, &mut parameters)?;

    // sh receives the values as argv after `--`; the script only ever sees
    // them as positional parameters.
    let command = vec!["sh".to_string(), "-c".to_string(), script, "--".to_string()];

    Ok(ToolDefinition {
        name: entry.name.clone(),
        description: entry.description.clone(),
        command,
        parameters,
        source: Some(ToolSource::Shell(raw.to_string())),
    })
}

fn expand_command(entry: &RawToolEntry) -> Result<ToolDefinition, ToolConfigError> {
    let tool = entry.name.clone();
    let command = entry
        .command
        .clone()
        .filter(|c| !c.is_empty())
        .ok_or(ToolConfigError::EmptyTemplate { tool: tool.clone() })?;

    let mut parameters: Vec<ToolParameter> = Vec::with_capacity(entry.parameters.len());
    for raw in &entry.parameters {
        if parameters.iter().any(|p| p.name == raw.name) {
            return Err(ToolConfigError::DuplicateParameter {
                tool: tool.clone(),
                param: raw.name.clone(),
            });
        }
        let inject = match raw.inject_as.as_deref() {
            None | Some("argument") => InjectionMode::Argument { position: raw.position },
            Some("option") => InjectionMode::Option {
                flag: raw.option_name.clone().ok_or_else(|| {
                    ToolConfigError::MissingOptionName {
                        tool: tool.clone(),
                        param: raw.name.clone(),
                    }
                })?,
            },
            Some("stdin") => InjectionMode::Stdin,
            Some(_) => InjectionMode::Argument { position: raw.position },
        };
        parameters.push(ToolParameter {
            name: raw.name.clone(),
            description: raw.description.clone(),
            inject,
        });
    }

    if let Some(stdin_name) = &entry.stdin {
        mark_stdin(&mut parameters, stdin_name);
    }
    ensure_single_stdin(&tool, &parameters)?;

    Ok(ToolDefinition {
        name: entry.name.clone(),
        description: entry.description.clone(),
        command,
        parameters,
        source: None,
    })
}

/// Merge user declarations into template-inferred parameters.
///
/// Declarations may add a description or introduce the stdin parameter;
/// they can never change the injection mode the template implies.
fn merge_declarations(
    entry: &RawToolEntry,
    parameters: &mut Vec<ToolParameter>,
) -> Result<(), ToolConfigError> {
    let tool = entry.name.clone();
    let inferred: Vec<String> = parameters.iter().map(|p| p.name.clone()).collect();

    for raw in &entry.parameters {
        let declares_stdin = raw.inject_as.as_deref() == Some("stdin")
            || entry.stdin.as_deref() == Some(raw.name.as_str());
        if let Some(param) = parameters.iter_mut().find(|p| p.name == raw.name) {
            if declares_stdin {
                return Err(ToolConfigError::StdinParameterInTemplate {
                    tool: tool.clone(),
                    param: raw.name.clone(),
                });
            }
            if param.description.is_none() {
                param.description = raw.description.clone();
            }
        } else if declares_stdin {
            parameters.push(ToolParameter {
                name: raw.name.clone(),
                description: raw.description.clone(),
                inject: InjectionMode::Stdin,
            });
        } else {
            return Err(ToolConfigError::UnknownDeclaredParameter {
                tool: tool.clone(),
                param: raw.name.clone(),
            });
        }
    }

    if let Some(stdin_name) = &entry.stdin {
        if inferred.contains(stdin_name) {
            return Err(ToolConfigError::StdinParameterInTemplate {
                tool: tool.clone(),
                param: stdin_name.clone(),
            });
        }
        if !parameters.iter().any(|p| p.name == *stdin_name) {
            parameters.push(ToolParameter {
                name: stdin_name.clone(),
                description: None,
                inject: InjectionMode::Stdin,
            });
        }
    }

    ensure_single_stdin(&tool, parameters)
}

fn mark_stdin(parameters: &mut Vec<ToolParameter>, name: &str) {
    if let Some(param) = parameters.iter_mut().find(|p| p.name == name) {
        param.inject = InjectionMode::Stdin;
    } else {
        parameters.push(ToolParameter {
            name: name.to_string(),
            description: None,
            inject: InjectionMode::Stdin,
        });
    }
}

fn ensure_single_stdin(tool: &str, parameters: &[ToolParameter]) -> Result<(), ToolConfigError> {
    let stdin: Vec<&str> = parameters
        .iter()
        .filter(|p| p.inject == InjectionMode::Stdin)
        .map(|p| p.name.as_str())
        .collect();
    if stdin.len() > 1 {
        return Err(ToolConfigError::MultipleStdinParameters {
            tool: tool.to_string(),
            first: stdin[0].to_string(),
            second: stdin[1].to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
