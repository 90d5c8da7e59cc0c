// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quote-aware tokenizer for `exec:` tool templates.
//!
//! `exec:` templates are split into argv without any shell involved, so
//! only quoting and backslash escapes are honoured. Shell metacharacters
//! are a load-time error: their presence means the author expected a shell
//! to interpret the line, which exec mode deliberately never does.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnterminatedQuote,
    /// A character (or `$(`) that only a shell would interpret.
    Metacharacter(String),
}

/// Metacharacters rejected outside quotes.
const UNQUOTED_META: &[char] = &['|', '&', ';', '<', '>'];

/// Split a template into tokens, honouring single quotes, double quotes,
/// and backslash escapes.
///
/// Rules:
/// - Unquoted `|`, `&`, `;`, `<`, `>` are rejected.
/// - `` ` `` and `$(` are rejected everywhere except inside single quotes
///   (a shell would expand them even inside double quotes).
/// - Quotes are stripped; `${name}` placeholder text passes through intact.
pub fn split(template: &str) -> Result<Vec<String>, LexError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    tokens.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(LexError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(LexError::UnterminatedQuote),
                        },
                        Some('`') => return Err(LexError::Metacharacter("`".to_string())),
                        Some('$') if chars.peek() == Some(&'(') => {
                            return Err(LexError::Metacharacter("$(".to_string()));
                        }
                        Some(c) => current.push(c),
                        None => return Err(LexError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => current.push('\\'),
                }
            }
            '`' => return Err(LexError::Metacharacter("`".to_string())),
            '$' if chars.peek() == Some(&'(') => {
                return Err(LexError::Metacharacter("$(".to_string()));
            }
            c if UNQUOTED_META.contains(&c) => {
                return Err(LexError::Metacharacter(c.to_string()));
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
#[path = "lex_tests.rs"]
mod tests;
