// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent directory loading.
//!
//! An agent is immutable during a run: `config.yaml` (LLM parameters, tool
//! definitions, optional lifecycle hooks), `system_prompt.md`, and an
//! optional context manifest (inline under `context:` or a sibling
//! `context.yaml`). Loading expands all tools eagerly so configuration
//! errors fail before any run state is created.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::context::ContextManifest;
use crate::error::AgentError;
use crate::expand::{expand_tools, RawToolEntry};
use crate::hook::LifecycleHooks;
use crate::tool::ToolDefinition;

/// Default iteration budget for a run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 30;

/// LLM call parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmParams {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Parsed `config.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub llm: LlmParams,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Per-tool wall-clock budget in milliseconds.
    #[serde(default = "default_tool_timeout_ms")]
    pub tool_timeout_ms: u64,
    /// Capture cap per tool output stream, in bytes.
    #[serde(default = "default_tool_output_limit")]
    pub tool_output_limit: usize,
    #[serde(default)]
    pub tools: Vec<RawToolEntry>,
    #[serde(default)]
    pub lifecycle_hooks: LifecycleHooks,
    /// Inline context manifest; `context.yaml` wins if both exist.
    #[serde(default)]
    pub context: Option<ContextManifest>,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_tool_timeout_ms() -> u64 {
    120_000
}

fn default_tool_output_limit() -> usize {
    256 * 1024
}

/// A fully-loaded agent, ready to drive a run.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Canonicalized agent directory (`${AGENT_HOME}`).
    pub home: PathBuf,
    pub config: AgentConfig,
    pub system_prompt: String,
    /// Expanded tool table.
    pub tools: Vec<ToolDefinition>,
    pub manifest: ContextManifest,
    /// SHA-256 hex digest of the raw config.yaml bytes.
    pub fingerprint: String,
}

impl Agent {
    /// Load an agent from its directory.
    pub fn load(dir: &Path) -> Result<Self, AgentError> {
        let home = dir
            .canonicalize()
            .map_err(|_| AgentError::NotFound(dir.to_path_buf()))?;
        if !home.is_dir() {
            return Err(AgentError::NotFound(home));
        }

        let config_path = home.join("config.yaml");
        let config_bytes = std::fs::read(&config_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AgentError::MissingFile { dir: home.clone(), file: "config.yaml".to_string() }
            } else {
                AgentError::Io { path: config_path.clone(), source }
            }
        })?;
        let config: AgentConfig = serde_yaml::from_slice(&config_bytes)?;
        let fingerprint = fingerprint_bytes(&config_bytes);

        let prompt_path = home.join("system_prompt.md");
        let system_prompt = std::fs::read_to_string(&prompt_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AgentError::MissingFile { dir: home.clone(), file: "system_prompt.md".to_string() }
            } else {
                AgentError::Io { path: prompt_path.clone(), source }
            }
        })?;

        let tools = expand_tools(&config.tools)?;
        let manifest = load_manifest(&home, &config)?;

        tracing::debug!(
            agent = %config.name,
            tools = tools.len(),
            fingerprint = %fingerprint,
            "agent loaded"
        );

        Ok(Self { home, config, system_prompt, tools, manifest, fingerprint })
    }

    /// Look up an expanded tool by name.
    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// `context.yaml` beats the inline manifest; absent both, the default
/// manifest (system prompt + journal) applies.
fn load_manifest(home: &Path, config: &AgentConfig) -> Result<ContextManifest, AgentError> {
    let manifest_path = home.join("context.yaml");
    if manifest_path.exists() {
        let bytes = std::fs::read(&manifest_path)
            .map_err(|source| AgentError::Io { path: manifest_path.clone(), source })?;
        return Ok(serde_yaml::from_slice(&bytes)?);
    }
    Ok(config
        .context
        .clone()
        .unwrap_or_else(ContextManifest::default_manifest))
}

/// SHA-256 hex digest used as the config fingerprint in RUN_START.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
