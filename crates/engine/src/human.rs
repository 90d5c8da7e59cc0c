// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-interaction handler for the built-in `ask_human` pseudo-tool.
//!
//! Interactive mode prompts on the terminal (with no-echo input for
//! sensitive answers). Async mode writes `interaction/request.json`, parks
//! the run as WAITING_FOR_INPUT, and a later `continue` invocation picks
//! the answer up from `interaction/response.txt`. Both modes produce the
//! same ACTION_RESULT; only the transport differs.

use delta_core::tool::ToolCall;
use delta_storage::journal::now_iso_ms;
use delta_storage::RunPaths;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};

use crate::error::EngineError;

/// Requested input style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Confirmation,
    Password,
}

/// Parsed `ask_human` arguments.
#[derive(Debug, Clone)]
pub struct AskHumanArgs {
    pub prompt: String,
    pub input_type: InputType,
    pub sensitive: bool,
}

impl AskHumanArgs {
    /// Lenient parse: a malformed call still yields a usable prompt so the
    /// operator sees something rather than the run failing.
    pub fn from_call(call: &ToolCall) -> Self {
        let prompt = call
            .str_arg("prompt")
            .unwrap_or("The agent requests input.")
            .to_string();
        let input_type = match call.str_arg("input_type") {
            Some("confirmation") => InputType::Confirmation,
            Some("password") => InputType::Password,
            _ => InputType::Text,
        };
        let sensitive = call
            .arguments
            .get("sensitive")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
            || input_type == InputType::Password;
        Self { prompt, input_type, sensitive }
    }
}

/// `interaction/request.json` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRequest {
    pub request_id: String,
    /// Tool call this request answers; the resumed ACTION_RESULT reuses it.
    pub call_id: String,
    pub prompt: String,
    pub input_type: InputType,
    pub sensitive: bool,
    pub ts: String,
}

impl InteractionRequest {
    pub fn new(call_id: &str, args: &AskHumanArgs) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            call_id: call_id.to_string(),
            prompt: args.prompt.clone(),
            input_type: args.input_type,
            sensitive: args.sensitive,
            ts: now_iso_ms(),
        }
    }
}

/// Persist the request and create the interaction directory.
pub fn write_request(paths: &RunPaths, request: &InteractionRequest) -> Result<(), EngineError> {
    std::fs::create_dir_all(paths.interaction_dir())?;
    let bytes = serde_json::to_vec_pretty(request)
        .map_err(|e| EngineError::Interaction(e.to_string()))?;
    std::fs::write(paths.interaction_request(), bytes)?;
    Ok(())
}

/// Load a pending request, if one exists.
pub fn pending_request(paths: &RunPaths) -> Option<InteractionRequest> {
    let bytes = std::fs::read(paths.interaction_request()).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(request) => Some(request),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable interaction request");
            None
        }
    }
}

/// Read the operator's answer, if written. Trailing newline stripped.
pub fn read_response(paths: &RunPaths) -> Option<String> {
    let text = std::fs::read_to_string(paths.interaction_response()).ok()?;
    Some(text.strip_suffix('\n').unwrap_or(&text).to_string())
}

/// Remove both interaction files (after the answer is journaled).
pub fn clear_interaction(paths: &RunPaths) {
    let _ = std::fs::remove_file(paths.interaction_request());
    let _ = std::fs::remove_file(paths.interaction_response());
    let _ = std::fs::remove_dir(paths.interaction_dir());
}

/// Synchronous terminal prompt. Returns the answer.
pub fn prompt_interactive(args: &AskHumanArgs) -> Result<String, EngineError> {
    let mut err = std::io::stderr();
    match args.input_type {
        InputType::Text => {
            write!(err, "{}\n> ", args.prompt).map_err(EngineError::Io)?;
            err.flush().map_err(EngineError::Io)?;
            if args.sensitive {
                read_hidden_line()
            } else {
                read_line()
            }
        }
        InputType::Confirmation => loop {
            write!(err, "{} [yes/no] ", args.prompt).map_err(EngineError::Io)?;
            err.flush().map_err(EngineError::Io)?;
            let answer = read_line()?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" => return Ok("yes".to_string()),
                "no" | "n" => return Ok("no".to_string()),
                _ => {
                    writeln!(err, "please answer yes or no").map_err(EngineError::Io)?;
                }
            }
        },
        InputType::Password => {
            write!(err, "{}\n> ", args.prompt).map_err(EngineError::Io)?;
            err.flush().map_err(EngineError::Io)?;
            read_hidden_line()
        }
    }
}

fn read_line() -> Result<String, EngineError> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(EngineError::Io)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Read a line with echo disabled, printing an asterisk per character.
fn read_hidden_line() -> Result<String, EngineError> {
    use nix::sys::termios::{tcgetattr, tcsetattr, LocalFlags, SetArg};

    let stdin = std::io::stdin();
    let original = tcgetattr(&stdin)
        .map_err(|e| EngineError::Interaction(format!("terminal setup failed: {}", e)))?;
    let mut quiet = original.clone();
    quiet
        .local_flags
        .remove(LocalFlags::ECHO | LocalFlags::ICANON);
    tcsetattr(&stdin, SetArg::TCSANOW, &quiet)
        .map_err(|e| EngineError::Interaction(format!("terminal setup failed: {}", e)))?;

    let result = read_hidden_bytes(&stdin);

    // Always restore the terminal, even if reading failed.
    let _ = tcsetattr(&stdin, SetArg::TCSANOW, &original);
    let _ = writeln!(std::io::stderr());
    result
}

fn read_hidden_bytes(stdin: &std::io::Stdin) -> Result<String, EngineError> {
    let mut err = std::io::stderr();
    let mut answer = Vec::new();
    let mut byte = [0u8; 1];
    let mut handle = stdin.lock();
    loop {
        let n = handle.read(&mut byte).map_err(EngineError::Io)?;
        if n == 0 {
            break;
        }
        match byte[0] {
            b'\n' | b'\r' => break,
            // Backspace / DEL
            0x08 | 0x7f => {
                if answer.pop().is_some() {
                    let _ = write!(err, "\u{8} \u{8}");
                    let _ = err.flush();
                }
            }
            b => {
                answer.push(b);
                let _ = write!(err, "*");
                let _ = err.flush();
            }
        }
    }
    String::from_utf8(answer).map_err(|_| EngineError::Interaction("input was not UTF-8".to_string()))
}

#[cfg(test)]
#[path = "human_tests.rs"]
mod tests;
