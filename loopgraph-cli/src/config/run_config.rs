//! Run config: model endpoint, sampling, search and run limits. Filled from env / .env.
//!
//! Interacts with [`run_with_config`](crate::run_with_config) and loopgraph's
//! `ChatOpenAI`, `TavilySearchTool`, `AgentOptions` and `RunnableConfig`.

use std::sync::Arc;
use std::time::Duration;

use async_openai::config::OpenAIConfig;
use loopgraph::{
    AgentOptions, CancellationToken, ChatOpenAI, HandleToolErrors, RetryPolicy, RunnableConfig,
    TavilySearchTool, ToolCallPolicy, ToolChoiceMode, ToolRegistry, DEFAULT_MAX_STEPS,
};

use super::RunOptions;

/// Error type used for config loading.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

const DEFAULT_MAX_TOKENS: u32 = 512;

/// Run config. Built once by [`from_env`](RunConfig::from_env) and not changed
/// during a run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    pub api_key: String,
    /// Model name, e.g. `llama3-8b-8192`.
    pub model: String,
    /// Sampling temperature 0–2. Default 0.0.
    pub temperature: f32,
    pub max_tokens: u32,
    /// Tool choice mode sent with the tool list; unset leaves it to the API.
    pub tool_choice: Option<ToolChoiceMode>,
    /// Tavily key; the search tool cannot be built without it.
    pub tavily_api_key: Option<String>,
    pub search_max_results: usize,
    pub max_steps: usize,
    pub timeout: Option<Duration>,
    /// Retries for transient failures; 0 disables retry.
    pub max_retries: usize,
    pub handle_tool_errors: bool,
    pub all_tool_calls: bool,
    /// When true, the default log level is debug.
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_API_BASE`, `OPENAI_MODEL`,
    /// `OPENAI_TEMPERATURE`, `OPENAI_MAX_TOKENS`, `OPENAI_TOOL_CHOICE` (auto|none|required),
    /// `TAVILY_API_KEY`, `SEARCH_MAX_RESULTS`, `MAX_STEPS`, `RUN_TIMEOUT_SECS`,
    /// `LLM_MAX_RETRIES` and `HANDLE_TOOL_ERRORS` are optional. Unparsable values fall
    /// back to the default.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = env_parse("OPENAI_TEMPERATURE").unwrap_or(0.0);
        let max_tokens = env_parse("OPENAI_MAX_TOKENS").unwrap_or(DEFAULT_MAX_TOKENS);
        let tool_choice = env_parse("OPENAI_TOOL_CHOICE");
        let tavily_api_key = std::env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let search_max_results =
            env_parse("SEARCH_MAX_RESULTS").unwrap_or(loopgraph::tools::DEFAULT_MAX_RESULTS);
        let max_steps = env_parse("MAX_STEPS").unwrap_or(DEFAULT_MAX_STEPS);
        let timeout = env_parse::<u64>("RUN_TIMEOUT_SECS").map(Duration::from_secs);
        let max_retries = env_parse("LLM_MAX_RETRIES").unwrap_or(0);
        let handle_tool_errors = std::env::var("HANDLE_TOOL_ERRORS")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            max_tokens,
            tool_choice,
            tavily_api_key,
            search_max_results,
            max_steps,
            timeout,
            max_retries,
            handle_tool_errors,
            all_tool_calls: false,
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(t) = options.temperature {
            self.temperature = t;
        }
        if let Some(tc) = options.tool_choice {
            self.tool_choice = Some(tc);
        }
        if let Some(n) = options.max_steps {
            self.max_steps = n;
        }
        if let Some(secs) = options.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(n) = options.max_retries {
            self.max_retries = n;
        }
        if options.handle_tool_errors {
            self.handle_tool_errors = true;
        }
        if options.all_tool_calls {
            self.all_tool_calls = true;
        }
        self.verbose = options.verbose;
    }

    /// Build-time knobs of the agent graph.
    pub fn agent_options(&self) -> AgentOptions {
        AgentOptions {
            tool_call_policy: if self.all_tool_calls {
                ToolCallPolicy::All
            } else {
                ToolCallPolicy::First
            },
            handle_tool_errors: if self.handle_tool_errors {
                HandleToolErrors::Always(None)
            } else {
                HandleToolErrors::Never
            },
            retry_policy: self.retry_policy(),
        }
    }

    /// Exponential backoff from 500ms up to 8s; `RetryPolicy::None` when `max_retries` is 0.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.max_retries == 0 {
            return RetryPolicy::none();
        }
        RetryPolicy::exponential(
            self.max_retries,
            Duration::from_millis(500),
            Duration::from_secs(8),
            2.0,
        )
    }

    /// Per-run limits plus the token that cancels this run.
    pub fn runnable_config(&self, cancellation: CancellationToken) -> RunnableConfig {
        let config = RunnableConfig::default()
            .with_max_steps(self.max_steps)
            .with_cancellation(cancellation);
        match self.timeout {
            Some(t) => config.with_timeout(t),
            None => config,
        }
    }

    /// Chat client for the configured endpoint and model.
    pub fn chat_client(&self) -> ChatOpenAI {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&self.api_key)
            .with_api_base(&self.api_base);
        let client = ChatOpenAI::with_config(openai_config, &self.model)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        match self.tool_choice {
            Some(mode) => client.with_tool_choice(mode),
            None => client,
        }
    }

    /// Registry holding the Tavily search tool.
    ///
    /// # Errors
    ///
    /// Fails when `TAVILY_API_KEY` is not configured.
    pub fn search_tools(&self) -> Result<ToolRegistry, Error> {
        let key = self.tavily_api_key.as_deref().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "TAVILY_API_KEY is not set; web search needs it",
            )
        })?;
        let search = TavilySearchTool::new(key).with_max_results(self.search_max_results);
        Ok(ToolRegistry::new().with_tool(Arc::new(search)))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
