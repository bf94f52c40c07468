//! Tavily web search tool.
//!
//! Posts the model's query to the Tavily search API and returns the top results as a
//! JSON array of `{ url, content }`, coerced to text for the transcript.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

/// Tool name advertised to the model.
pub const TOOL_TAVILY_SEARCH: &str = "tavily_search_results_json";

/// Default number of results returned per query.
pub const DEFAULT_MAX_RESULTS: usize = 2;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct SearchHit {
    url: String,
    content: String,
}

/// Web search over the Tavily API, bounded to `max_results` hits per query.
///
/// # Interaction
///
/// - **reqwest::Client**: performs the POST request
/// - **ToolRegistry**: registers this tool under [`TOOL_TAVILY_SEARCH`]
/// - **ToolSourceError**: missing query is `InvalidInput`; HTTP failures are `Transport`
pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_results: usize,
}

impl TavilySearchTool {
    /// Creates the tool with a default HTTP client and [`DEFAULT_MAX_RESULTS`].
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    /// Creates the tool with a custom HTTP client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Overrides the API endpoint (e.g. a proxy or a local stub server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Accepts `{"query": ".."}` or, from models that skip the wrapper, a bare string.
fn query_from_args(args: &Value) -> Result<&str, ToolSourceError> {
    args.get("query")
        .and_then(Value::as_str)
        .or_else(|| args.as_str())
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        TOOL_TAVILY_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_TAVILY_SEARCH.to_string(),
            description: Some(
                "A search engine optimized for comprehensive, accurate, and trusted results. \
                 Useful for when you need to answer questions about current events. \
                 Input should be a search query."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "search query to look up"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = query_from_args(&args)?;
        tracing::debug!(query, max_results = self.max_results, "Tavily search");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                query,
                max_results: self.max_results,
            })
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolSourceError::Transport(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("failed to read response: {}", e)))?;

        let hits: Vec<SearchHit> = body.results.into_iter().take(self.max_results).collect();
        let text = serde_json::to_string(&hits)
            .map_err(|e| ToolSourceError::Transport(format!("failed to encode results: {}", e)))?;
        Ok(ToolCallContent { text })
    }
}
