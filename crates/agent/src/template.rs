// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder scanning and path-variable interpolation.

use regex::Regex;
use std::sync::LazyLock;

/// Regex pattern for `${name}` or `${name:raw}` tool-template placeholders.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)(:raw)?\}")
        .expect("constant regex pattern is valid")
});

/// One `${...}` occurrence in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub raw: bool,
}

/// Scan a template for placeholders, in order of appearance.
pub fn placeholders(template: &str) -> Vec<Placeholder> {
    PLACEHOLDER_PATTERN
        .captures_iter(template)
        .map(|caps| Placeholder {
            name: caps[1].to_string(),
            raw: caps.get(2).is_some(),
        })
        .collect()
}

/// Replace each placeholder using the given function.
///
/// Used to render exec-mode argv tokens (values spliced as argv text, never
/// through a shell) and to rewrite shell-mode scripts to positional
/// parameters. Unmatched placeholders are left verbatim.
pub fn substitute(template: &str, mut value_for: impl FnMut(&Placeholder) -> Option<String>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let ph = Placeholder {
                name: caps[1].to_string(),
                raw: caps.get(2).is_some(),
            };
            value_for(&ph).unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Expand `${AGENT_HOME}` and `${CWD}` path variables.
///
/// These are the only variables available in context-manifest paths and
/// hook command vectors; tool-parameter placeholders never reach this
/// function.
pub fn expand_path_vars(input: &str, agent_home: &std::path::Path, cwd: &std::path::Path) -> String {
    input
        .replace("${AGENT_HOME}", &agent_home.display().to_string())
        .replace("${CWD}", &cwd.display().to_string())
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
