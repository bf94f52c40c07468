//! Mock ToolSource for tests and offline runs.
//!
//! Returns a fixed tool list and fixed call results; no network required.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: fixed tool list and fixed call result.
///
/// `list_tools()` returns a configurable list; `call_tool(name, args)` returns the
/// per-name result if one was set, else the default text. Unknown names fail with
/// `NotFound`. Every call is recorded for assertions.
///
/// **Interaction**: Implements `ToolSource`; used by `ToolNode` tests and scenarios.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    call_result: String,
    results: HashMap<String, String>,
    failing: HashMap<String, String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolSource {
    /// Mock that lists one tool `search` and returns a fixed weather snippet.
    pub fn search_example() -> Self {
        Self::new(
            vec![ToolSpec {
                name: "search".to_string(),
                description: Some("Search the web.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"]
                }),
            }],
            "Paris: 18°C, partly cloudy".to_string(),
        )
    }

    /// Creates a mock with custom tool list and fixed call result.
    pub fn new(tools: Vec<ToolSpec>, call_result: String) -> Self {
        Self {
            tools,
            call_result,
            results: HashMap::new(),
            failing: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the text returned by call_tool (builder style).
    pub fn with_call_result(mut self, text: impl Into<String>) -> Self {
        self.call_result = text.into();
        self
    }

    /// Registers `name` with its own result text.
    pub fn with_tool_result(mut self, name: &str, text: impl Into<String>) -> Self {
        self.add_spec(name);
        self.results.insert(name.to_string(), text.into());
        self
    }

    /// Makes every call to `name` fail with a `Transport` error carrying `message`.
    pub fn with_failure(mut self, name: &str, message: impl Into<String>) -> Self {
        self.add_spec(name);
        self.failing.insert(name.to_string(), message.into());
        self
    }

    /// Calls received so far as `(name, arguments)`, in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn add_spec(&mut self, name: &str) {
        if !self.tools.iter().any(|t| t.name == name) {
            self.tools.push(ToolSpec {
                name: name.to_string(),
                description: None,
                input_schema: json!({ "type": "object" }),
            });
        }
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::search_example()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((name.to_string(), arguments));
        }
        if let Some(message) = self.failing.get(name) {
            return Err(ToolSourceError::Transport(message.clone()));
        }
        if !self.tools.iter().any(|t| t.name == name) {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        let text = self
            .results
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.call_result.clone());
        Ok(ToolCallContent { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Default mock lists `search` and records each call.
    #[tokio::test]
    async fn default_lists_search_and_records_calls() {
        let tools = MockToolSource::default();
        let specs = tools.list_tools().await.unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "search");

        let out = tools
            .call_tool("search", json!({"query": "weather in Paris"}))
            .await
            .unwrap();
        assert!(out.text.contains("18°C"));
        assert_eq!(
            tools.calls(),
            vec![("search".to_string(), json!({"query": "weather in Paris"}))]
        );
    }

    /// **Scenario**: Unknown tool is NotFound; a failing tool is a Transport error.
    #[tokio::test]
    async fn unknown_and_failing_tools() {
        let tools = MockToolSource::default().with_failure("flaky", "503 Service Unavailable");
        assert!(matches!(
            tools.call_tool("nope", json!({})).await,
            Err(ToolSourceError::NotFound(_))
        ));
        match tools.call_tool("flaky", json!({})).await {
            Err(ToolSourceError::Transport(msg)) => assert!(msg.contains("503")),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    /// **Scenario**: Per-tool results override the default text.
    #[tokio::test]
    async fn per_tool_results() {
        let tools = MockToolSource::default().with_tool_result("calc", "4");
        assert_eq!(tools.call_tool("calc", json!({})).await.unwrap().text, "4");
        assert!(tools
            .call_tool("search", json!({}))
            .await
            .unwrap()
            .text
            .contains("Paris"));
    }
}
