// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LLM chat-completion client.
//!
//! The engine talks to exactly one HTTP endpoint: POST a [`ChatRequest`],
//! receive a [`ChatResponse`]. The trait seam exists so the scheduler can
//! be driven by a scripted fake in tests; the retry loop lives in the
//! scheduler (which records SYSTEM_MESSAGE retry notices), so `complete`
//! here is a single attempt.

use async_trait::async_trait;
use delta_core::message::{ChatRequest, ChatResponse};
use std::time::Duration;
use thiserror::Error;

/// HTTP timeout for one LLM call.
pub const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// One-attempt completion errors.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// Connection, DNS, or timeout trouble. Always retryable.
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("LLM endpoint returned {status}: {body}")]
    Endpoint {
        status: u16,
        body: String,
        /// Parsed Retry-After seconds, when the endpoint sent one.
        retry_after: Option<u64>,
    },

    /// The body did not parse as a chat response. Not retryable.
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// 5xx and 429 are retryable, as are transport failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(_) => true,
            LlmError::Endpoint { status, .. } => *status == 429 || *status >= 500,
            LlmError::InvalidResponse(_) => false,
        }
    }

    /// Server-requested delay (429 Retry-After).
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::Endpoint { retry_after: Some(secs), .. } => {
                Some(Duration::from_secs(*secs))
            }
            _ => None,
        }
    }
}

/// Chat-completion endpoint seam.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One attempt; the caller owns retries.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Exponential backoff with jitter for LLM retries.
///
/// Three attempts, base 1s, factor 2, jitter ±20%.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base: Duration,
    pub factor: f64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, base: Duration::from_secs(1), factor: 2.0, jitter: 0.2 }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (0-based: the delay after attempt N).
    pub fn delay(&self, retry: u32) -> Duration {
        use rand::Rng;
        let exp = self.base.as_secs_f64() * self.factor.powi(retry as i32);
        let spread = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        Duration::from_secs_f64((exp * (1.0 + spread)).max(0.0))
    }
}

/// reqwest-backed client for the configured endpoint.
pub struct HttpLlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLlmClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(LLM_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into(), api_key })
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Endpoint {
                status: status.as_u16(),
                body: truncate_body(&body),
                retry_after,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            LlmError::InvalidResponse(format!("{} in body: {}", e, truncate_body(&body)))
        })
    }
}

/// Keep error bodies log-sized.
fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 512;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
#[path = "llm_tests.rs"]
mod tests;
