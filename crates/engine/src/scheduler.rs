// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Think–Act–Observe scheduler.
//!
//! Single-threaded cooperative within one run: at most one LLM call, one
//! tool, or one hook is in flight at any moment. Every state change is an
//! appended journal event, so an interrupt at any suspension point leaves
//! a journal the next invocation can pick up verbatim.
//!
//! Termination, in priority order: fatal error (FAILED, after the
//! `on_error` hook), interrupt signal (INTERRUPTED), async `ask_human`
//! (WAITING_FOR_INPUT), iteration budget (FAILED), assistant returned no
//! tool calls (COMPLETED).

use delta_agent::hook::{HookDef, HookKind};
use delta_agent::tool::ASK_HUMAN;
use delta_core::event::{Event, HookOutcome};
use delta_core::id::RunId;
use delta_core::message::{ChatRequest, ChatResponse, FunctionSchema, ToolSchema};
use delta_core::run::RunStatus;
use delta_core::tool::ToolCall;
use delta_adapters::llm::{LlmClient, RetryPolicy};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::context;
use crate::error::EngineError;
use crate::hooks::{HookExecutor, HookPayload, HookResult};
use crate::human::{self, AskHumanArgs, InteractionRequest};
use crate::session::RunSession;
use crate::signal::SignalWatcher;
use crate::tools::{self, ToolOutcome};

/// How a finished engine invocation left the run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub status: RunStatus,
    pub reason: Option<String>,
    /// For WAITING_FOR_INPUT: where the operator writes the answer.
    pub response_path: Option<PathBuf>,
    /// For WAITING_FOR_INPUT: the prompt shown to the operator.
    pub prompt: Option<String>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// Per-call control flow inside one iteration.
enum Flow {
    Continue,
    Waiting { prompt: String },
    /// The on_error hook set `escalate=true` on a recoverable error.
    Escalate { reason: String },
}

pub struct Engine<L: LlmClient> {
    llm: L,
    retry: RetryPolicy,
    session: RunSession,
    signals: SignalWatcher,
    interactive: bool,
}

impl<L: LlmClient> Engine<L> {
    pub fn new(llm: L, session: RunSession, signals: SignalWatcher, interactive: bool) -> Self {
        Self { llm, retry: RetryPolicy::default(), session, signals, interactive }
    }

    /// Override the LLM retry policy (tests use a fast one).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Drive the run to its next stopping point.
    pub async fn run(mut self) -> Result<RunOutcome, EngineError> {
        if self.session.resumed {
            if let Some(outcome) = self.resume_preamble().await? {
                return Ok(outcome);
            }
        }

        loop {
            if self.signals.interrupted() {
                return self.interrupt();
            }

            let iteration = self.session.metadata.iterations_completed + 1;
            tracing::debug!(run_id = %self.session.run_id, iteration, "iteration start");

            // Think: assemble context, offer it to the pre_llm_req hook,
            // call the endpoint.
            let entries = match self.session.journal.read_all() {
                Ok(entries) => entries,
                Err(e) => return self.fail(format!("journal read failed: {}", e)).await,
            };
            let messages = match context::build_messages(
                &self.session.agent,
                self.session.workspace.root(),
                &entries,
            )
            .await
            {
                Ok(messages) => messages,
                Err(e) => return self.fail(format!("context assembly failed: {}", e)).await,
            };

            let llm = &self.session.agent.config.llm;
            let mut request = ChatRequest {
                model: llm.model.clone(),
                temperature: llm.temperature,
                max_tokens: llm.max_tokens,
                messages,
                tools: self.tool_schemas(),
            };

            let invocation_dir = self.session.paths.invocation_dir(iteration);
            write_json(&invocation_dir, "proposed_payload.json", &request);

            request = self.rewrite_payload_hook(iteration, request).await?;
            write_json(&invocation_dir, "final_payload.json", &request);

            let response = match self.call_llm(&request).await? {
                Ok(response) => response,
                Err(reason) => {
                    if self.signals.interrupted() {
                        return self.interrupt();
                    }
                    self.session.append(&Event::SystemMessage { content: reason.clone() })?;
                    return self.fail(reason).await;
                }
            };
            write_json(&invocation_dir, "response.json", &response);

            if let Some(def) = self.hook_def(HookKind::PostLlmResp) {
                let payload = serde_json::to_value(&response).unwrap_or_default();
                let result = self
                    .invoke_hook(HookKind::PostLlmResp, &def, iteration, HookPayload::Json(&payload))
                    .await;
                self.append_audit(HookKind::PostLlmResp, &result)?;
            }

            // Journal the assistant turn, including every call it asked
            // for; the descriptors are what resume re-dispatches from.
            let (tool_calls, unparseable) = parse_tool_calls(&response);
            self.session.append(&Event::Thought {
                content: response.content.clone().unwrap_or_default(),
                tool_calls: tool_calls.clone(),
            })?;

            if tool_calls.is_empty() {
                self.session.finish(RunStatus::Completed, None)?;
                return Ok(self.outcome(RunStatus::Completed, None));
            }

            // Act and observe, in the order the assistant returned.
            for call in &tool_calls {
                if self.signals.interrupted() {
                    return self.interrupt();
                }
                let parse_error = unparseable
                    .iter()
                    .find(|(id, _)| id == &call.id)
                    .map(|(_, e)| e.clone());
                match self.dispatch_call(call, parse_error, iteration).await? {
                    Flow::Continue => {}
                    Flow::Waiting { prompt } => {
                        return Ok(self.waiting_outcome(prompt));
                    }
                    Flow::Escalate { reason } => {
                        return self.fail_escalated(reason);
                    }
                }
            }

            self.session.record_iteration(iteration)?;

            let budget = self.session.agent.config.max_iterations;
            if iteration >= budget {
                return self.fail("max_iterations_exceeded".to_string()).await;
            }
        }
    }

    /// Re-dispatch tool calls whose results never made it to the journal.
    ///
    /// If the previous invocation died between a THOUGHT and its last
    /// ACTION_RESULT, those calls ran (or never ran) without a journaled
    /// observation, so the conversation cannot be reconstructed past them.
    /// Redoing them is safe by the invariant that every observation is
    /// journaled before the next think step.
    async fn resume_preamble(&mut self) -> Result<Option<RunOutcome>, EngineError> {
        let entries = match self.session.journal.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                return self.fail(format!("journal read failed: {}", e)).await.map(Some)
            }
        };

        let mut pending: Vec<ToolCall> = Vec::new();
        let mut thought_count: u32 = 0;
        let mut answered: HashSet<String> = HashSet::new();
        for entry in &entries {
            match &entry.event {
                Event::Thought { tool_calls, .. } => {
                    thought_count += 1;
                    pending = tool_calls.clone();
                }
                Event::ActionResult { call_id, .. } => {
                    answered.insert(call_id.clone());
                }
                _ => {}
            }
        }
        pending.retain(|call| !answered.contains(&call.id));

        let iteration = self.session.metadata.iterations_completed + 1;
        for call in &pending {
            if self.signals.interrupted() {
                return self.interrupt().map(Some);
            }
            tracing::info!(run_id = %self.session.run_id, call_id = %call.id, tool = %call.name, "re-dispatching interrupted tool call");
            match self.dispatch_call(call, None, iteration).await? {
                Flow::Continue => {}
                Flow::Waiting { prompt } => return Ok(Some(self.waiting_outcome(prompt))),
                Flow::Escalate { reason } => return self.fail_escalated(reason).map(Some),
            }
        }

        // Every journaled THOUGHT is now fully answered; align the
        // iteration counter with the journal.
        if thought_count > self.session.metadata.iterations_completed {
            self.session.record_iteration(thought_count)?;
        }
        Ok(None)
    }

    /// One tool call: hooks, lookup, execution, observation.
    async fn dispatch_call(
        &mut self,
        call: &ToolCall,
        parse_error: Option<String>,
        iteration: u32,
    ) -> Result<Flow, EngineError> {
        if let Some(message) = parse_error {
            return self
                .synthetic_result(call, format!(
                    "Error: arguments for tool '{}' were not valid JSON: {}",
                    call.name, message
                ))
                .await;
        }

        if call.name == ASK_HUMAN {
            return self.handle_ask_human(call);
        }

        let mut arguments = call.arguments.clone();

        if let Some(def) = self.hook_def(HookKind::PreToolExec) {
            let payload = serde_json::json!({
                "tool": call.name,
                "call_id": call.id,
                "arguments": arguments,
            });
            let result = self
                .invoke_hook(HookKind::PreToolExec, &def, iteration, HookPayload::Json(&payload))
                .await;
            self.append_audit(HookKind::PreToolExec, &result)?;
            if result.outcome() == HookOutcome::Success {
                if let Some(control) = result.control {
                    // skip wins when both skip and override_args are set.
                    if control.skip {
                        let observation = control
                            .observation
                            .unwrap_or_else(|| format!("tool '{}' skipped by pre_tool_exec hook", call.name));
                        self.append_result(call, ToolOutcome::note(observation))?;
                        return Ok(Flow::Continue);
                    }
                    if let Some(override_args) = control.override_args {
                        arguments = override_args;
                    }
                }
            }
        }

        let Some(tool) = self.session.agent.tool(&call.name).cloned() else {
            return self
                .synthetic_result(call, format!("Error: unknown tool '{}'", call.name))
                .await;
        };

        let effective_call =
            ToolCall { id: call.id.clone(), name: call.name.clone(), arguments };
        let seq = self.session.journal.next_seq();
        let config = &self.session.agent.config;
        let outcome = tools::execute_tool(
            self.session.workspace.root(),
            &self.session.paths,
            &self.session.run_id,
            &tool,
            &effective_call,
            seq,
            Duration::from_millis(config.tool_timeout_ms),
            config.tool_output_limit,
        )
        .await;
        self.append_result(call, outcome.clone())?;

        // Fabricated error observations (bad arguments, spawn failure) go
        // to the on_error hook instead of post_tool_exec: nothing executed.
        if outcome.synthetic {
            if self.on_error_hook(&outcome.observation).await? {
                return Ok(Flow::Escalate {
                    reason: format!("on_error hook escalated: {}", outcome.observation),
                });
            }
            return Ok(Flow::Continue);
        }

        if let Some(def) = self.hook_def(HookKind::PostToolExec) {
            let payload = serde_json::json!({
                "tool": call.name,
                "call_id": call.id,
                "exit_code": outcome.exit_code,
                "truncated": outcome.truncated,
                "observation": outcome.observation,
            });
            let result = self
                .invoke_hook(HookKind::PostToolExec, &def, iteration, HookPayload::Json(&payload))
                .await;
            self.append_audit(HookKind::PostToolExec, &result)?;
        }

        Ok(Flow::Continue)
    }

    /// Built-in `ask_human`: synchronous prompt or async suspend.
    fn handle_ask_human(&mut self, call: &ToolCall) -> Result<Flow, EngineError> {
        let args = AskHumanArgs::from_call(call);

        if self.interactive {
            let answer = human::prompt_interactive(&args)?;
            self.session.append(&Event::ActionResult {
                call_id: call.id.clone(),
                observation: answer,
                exit_code: None,
                truncated: false,
                sensitive: args.sensitive,
            })?;
            return Ok(Flow::Continue);
        }

        let request = InteractionRequest::new(&call.id, &args);
        human::write_request(&self.session.paths, &request)?;
        self.session.set_status(RunStatus::WaitingForInput, None)?;
        tracing::info!(run_id = %self.session.run_id, "run parked for human input");
        Ok(Flow::Waiting { prompt: args.prompt })
    }

    /// LLM call with exponential backoff. `Ok(Err(reason))` is the final
    /// transport failure; genuine engine errors (journal writes for retry
    /// notices) propagate as `Err`.
    async fn call_llm(
        &mut self,
        request: &ChatRequest,
    ) -> Result<Result<ChatResponse, String>, EngineError> {
        let mut last_error = String::new();
        for attempt in 1..=self.retry.attempts {
            match self.llm.complete(request).await {
                Ok(response) => return Ok(Ok(response)),
                Err(e) => {
                    last_error = e.to_string();
                    if !e.is_retryable() || attempt == self.retry.attempts {
                        break;
                    }
                    let delay = e.retry_after().unwrap_or_else(|| self.retry.delay(attempt - 1));
                    self.session.append(&Event::SystemMessage {
                        content: format!(
                            "LLM attempt {}/{} failed ({}); retrying in {}ms",
                            attempt,
                            self.retry.attempts,
                            e,
                            delay.as_millis()
                        ),
                    })?;
                    tokio::time::sleep(delay).await;
                    if self.signals.interrupted() {
                        return Ok(Err("interrupted during LLM retry".to_string()));
                    }
                }
            }
        }
        Ok(Err(format!("LLM call failed: {}", last_error)))
    }

    /// `pre_llm_req`: the hook may replace the whole payload. A final
    /// payload that does not parse as a chat request downgrades the hook
    /// to FAILED and the proposed payload stands.
    async fn rewrite_payload_hook(
        &mut self,
        iteration: u32,
        request: ChatRequest,
    ) -> Result<ChatRequest, EngineError> {
        let Some(def) = self.hook_def(HookKind::PreLlmReq) else {
            return Ok(request);
        };
        let payload = serde_json::to_value(&request).unwrap_or_default();
        let mut result = self
            .invoke_hook(HookKind::PreLlmReq, &def, iteration, HookPayload::Proposed(&payload))
            .await;

        let mut request = request;
        if result.outcome() == HookOutcome::Success {
            if let Some(final_payload) = result.final_payload.take() {
                match serde_json::from_value::<ChatRequest>(final_payload) {
                    Ok(rewritten) => request = rewritten,
                    Err(e) => {
                        tracing::warn!(error = %e, "final_payload.json is not a chat request");
                        result.outcome = Some(HookOutcome::Failed);
                    }
                }
            }
        }
        self.append_audit(HookKind::PreLlmReq, &result)?;
        Ok(request)
    }

    fn hook_def(&self, kind: HookKind) -> Option<HookDef> {
        self.session.agent.config.lifecycle_hooks.get(kind).cloned()
    }

    async fn invoke_hook(
        &self,
        kind: HookKind,
        def: &HookDef,
        iteration: u32,
        payload: HookPayload<'_>,
    ) -> HookResult {
        let executor = HookExecutor {
            workspace_root: self.session.workspace.root(),
            agent_home: &self.session.agent.home,
            paths: &self.session.paths,
            run_id: &self.session.run_id,
        };
        executor.invoke(kind, def, iteration, payload).await
    }

    fn append_audit(&mut self, kind: HookKind, result: &HookResult) -> Result<(), EngineError> {
        self.session.append(&Event::HookExecutionAudit {
            hook: kind.as_str().to_string(),
            outcome: result.outcome(),
            io_path: result.io_path.clone(),
        })?;
        Ok(())
    }

    fn append_result(&mut self, call: &ToolCall, outcome: ToolOutcome) -> Result<(), EngineError> {
        self.session.append(&Event::ActionResult {
            call_id: call.id.clone(),
            observation: outcome.observation,
            exit_code: outcome.exit_code,
            truncated: outcome.truncated,
            sensitive: false,
        })?;
        Ok(())
    }

    /// Tool schemas for the request: every configured tool plus the
    /// built-in `ask_human`.
    fn tool_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .session
            .agent
            .tools
            .iter()
            .map(|tool| ToolSchema::function(tool.function_schema()))
            .collect();
        schemas.push(ToolSchema::function(ask_human_schema()));
        schemas
    }

    /// Invoke the on_error hook, if configured, and report whether its
    /// `control.json` asked for escalation.
    async fn on_error_hook(&mut self, reason: &str) -> Result<bool, EngineError> {
        let Some(def) = self.hook_def(HookKind::OnError) else {
            return Ok(false);
        };
        let payload = serde_json::json!({ "error": reason });
        let iteration = self.session.metadata.iterations_completed + 1;
        let result = self
            .invoke_hook(HookKind::OnError, &def, iteration, HookPayload::Json(&payload))
            .await;
        let escalate = result.control.as_ref().map(|c| c.escalate).unwrap_or(false);
        self.append_audit(HookKind::OnError, &result)?;
        Ok(escalate)
    }

    /// Journal a fabricated error observation, then let the on_error hook
    /// observe it or escalate it into run failure.
    async fn synthetic_result(
        &mut self,
        call: &ToolCall,
        message: String,
    ) -> Result<Flow, EngineError> {
        self.append_result(call, ToolOutcome::error(message.clone()))?;
        if self.on_error_hook(&message).await? {
            return Ok(Flow::Escalate {
                reason: format!("on_error hook escalated: {}", message),
            });
        }
        Ok(Flow::Continue)
    }

    /// Fatal path: on_error hook, SYSTEM_MESSAGE already written by the
    /// caller where relevant, RUN_END FAILED. The run is failing
    /// regardless, so the hook's escalate flag adds nothing here.
    async fn fail(&mut self, reason: String) -> Result<RunOutcome, EngineError> {
        tracing::error!(run_id = %self.session.run_id, reason = %reason, "run failed");
        self.on_error_hook(&reason).await?;
        self.session.finish(RunStatus::Failed, Some(reason.clone()))?;
        Ok(self.outcome(RunStatus::Failed, Some(reason)))
    }

    /// Terminal path for hook escalation. The on_error hook already ran
    /// (it is what asked for this), so only the RUN_END remains.
    fn fail_escalated(&mut self, reason: String) -> Result<RunOutcome, EngineError> {
        tracing::error!(run_id = %self.session.run_id, reason = %reason, "run failed by escalation");
        self.session.finish(RunStatus::Failed, Some(reason.clone()))?;
        Ok(self.outcome(RunStatus::Failed, Some(reason)))
    }

    fn interrupt(&mut self) -> Result<RunOutcome, EngineError> {
        tracing::info!(run_id = %self.session.run_id, "run interrupted");
        self.session
            .finish(RunStatus::Interrupted, Some("interrupt signal received".to_string()))?;
        Ok(self.outcome(RunStatus::Interrupted, Some("interrupt signal received".to_string())))
    }

    fn waiting_outcome(&self, prompt: String) -> RunOutcome {
        RunOutcome {
            run_id: self.session.run_id.clone(),
            status: RunStatus::WaitingForInput,
            reason: None,
            response_path: Some(self.session.paths.interaction_response()),
            prompt: Some(prompt),
        }
    }

    fn outcome(&self, status: RunStatus, reason: Option<String>) -> RunOutcome {
        RunOutcome {
            run_id: self.session.run_id.clone(),
            status,
            reason,
            response_path: None,
            prompt: None,
        }
    }
}

/// Decode wire tool calls; calls with unparseable arguments still get a
/// descriptor (empty arguments) so the THOUGHT event and the synthetic
/// error observation share a call ID.
fn parse_tool_calls(response: &ChatResponse) -> (Vec<ToolCall>, Vec<(String, String)>) {
    let mut calls = Vec::new();
    let mut errors = Vec::new();
    for wire in &response.tool_calls {
        match wire.parse() {
            Ok(call) => calls.push(call),
            Err(e) => {
                errors.push((wire.id.clone(), e.to_string()));
                calls.push(ToolCall::new(wire.id.clone(), wire.function.name.clone()));
            }
        }
    }
    (calls, errors)
}

/// Function schema for the built-in human-input tool.
fn ask_human_schema() -> FunctionSchema {
    FunctionSchema {
        name: ASK_HUMAN.to_string(),
        description: "Ask the human operator a question and wait for their answer."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "The question to put to the operator"
                },
                "input_type": {
                    "type": "string",
                    "enum": ["text", "confirmation", "password"],
                    "description": "How the answer should be collected"
                },
                "sensitive": {
                    "type": "boolean",
                    "description": "Redact the answer from logs"
                }
            },
            "required": ["prompt"]
        }),
    }
}

/// Best-effort artifact write; the journal stays authoritative.
fn write_json<T: serde::Serialize>(dir: &std::path::Path, name: &str, value: &T) {
    let result: std::io::Result<()> = (|| {
        std::fs::create_dir_all(dir)?;
        let bytes = serde_json::to_vec_pretty(value).unwrap_or_default();
        std::fs::write(dir.join(name), bytes)
    })();
    if let Err(e) = result {
        tracing::warn!(dir = %dir.display(), file = name, error = %e, "failed to write invocation artifact");
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
