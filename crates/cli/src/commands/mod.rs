// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod continue_cmd;
pub mod list_runs;
pub mod run;
pub mod tool;

use crate::exit_error::ExitError;
use anyhow::Result;
use delta_adapters::HttpLlmClient;
use delta_engine::RunOutcome;

/// Environment variable naming the chat-completion endpoint URL.
pub const ENV_API_URL: &str = "DELTA_API_URL";
/// Environment variable holding the bearer token, if the endpoint wants one.
pub const ENV_API_KEY: &str = "DELTA_API_KEY";

/// Build the HTTP LLM client from the environment.
pub fn llm_from_env() -> Result<HttpLlmClient> {
    let endpoint = std::env::var(ENV_API_URL).map_err(|_| {
        ExitError::new(
            1,
            format!("{} is not set; point it at a chat-completion endpoint", ENV_API_URL),
        )
    })?;
    let api_key = std::env::var(ENV_API_KEY).ok();
    Ok(HttpLlmClient::new(endpoint, api_key)
        .map_err(|e| ExitError::new(1, e.to_string()))?)
}

/// Print the operator-facing result of a run and convert the outcome into
/// the documented exit code.
pub fn finish_run(outcome: RunOutcome) -> Result<()> {
    match outcome.status {
        delta_core::run::RunStatus::Completed => {
            eprintln!("run {} completed", outcome.run_id);
            Ok(())
        }
        delta_core::run::RunStatus::WaitingForInput => {
            if let Some(prompt) = &outcome.prompt {
                eprintln!("The agent asks:\n  {}", prompt);
            }
            if let Some(path) = &outcome.response_path {
                eprintln!("Write the answer to {}", path.display());
            }
            eprintln!("Then resume with: delta continue --run-id {}", outcome.run_id);
            Err(ExitError::silent(outcome.exit_code()).into())
        }
        _ => {
            let detail = outcome.reason.clone().unwrap_or_else(|| outcome.status.to_string());
            Err(ExitError::new(
                outcome.exit_code(),
                format!("run {} ended {}: {}", outcome.run_id, outcome.status, detail),
            )
            .into())
        }
    }
}
