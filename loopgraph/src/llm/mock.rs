//! Mock LLM for tests and offline runs.
//!
//! Returns scripted responses in order, then repeats a fallback. Failures can be
//! injected for the first N calls to exercise retry and error paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// Mock LLM: scripted responses, then a fixed fallback.
///
/// Each `invoke` pops the next scripted response; when the script is exhausted the
/// fallback is returned on every call. Records how many times it was called and the
/// transcript length it saw on each call.
///
/// **Interaction**: Implements `LlmClient`; used by `AgentNode` in tests and by the
/// CLI tests.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    fallback: LlmResponse,
    /// Number of leading calls that fail with a reasoning `ServiceFailure`.
    failures: usize,
    calls: AtomicUsize,
    seen_lengths: Mutex<Vec<usize>>,
}

impl MockLlm {
    /// Mock that returns `fallback` on every call.
    pub fn new(fallback: LlmResponse) -> Self {
        Self::scripted(Vec::new(), fallback)
    }

    /// Mock that returns `script` in order, then `fallback` forever.
    pub fn scripted(script: Vec<LlmResponse>, fallback: LlmResponse) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            failures: 0,
            calls: AtomicUsize::new(0),
            seen_lengths: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always answers `content` with no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(LlmResponse::text(content))
    }

    /// Mock that requests the same tool call on every turn, so the loop never ends.
    pub fn always_tool_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self::new(LlmResponse::with_tool_calls(
            "",
            vec![ToolCall::new(name, args)],
        ))
    }

    /// One search call for `query` followed by the answer `answer`.
    pub fn search_then_answer(query: &str, answer: impl Into<String>) -> Self {
        Self::scripted(
            vec![LlmResponse::with_tool_calls(
                "",
                vec![ToolCall::new("search", json!({ "query": query })).with_id("call_0")],
            )],
            LlmResponse::text(answer),
        )
    }

    /// The first `failures` calls fail with a reasoning `ServiceFailure` (builder style).
    pub fn with_failures(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    /// Number of `invoke` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcript length passed to each successful call, in order.
    pub fn seen_lengths(&self) -> Vec<usize> {
        self.seen_lengths
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(AgentError::reasoning("mock reasoning service unavailable"));
        }
        if let Ok(mut seen) = self.seen_lengths.lock() {
            seen.push(messages.len());
        }
        let next = self
            .script
            .lock()
            .map_err(|_| AgentError::reasoning("mock script lock poisoned"))?
            .pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}
