//! # loopgraph
//!
//! A minimal agentic control loop on top of a small state-graph engine. A reasoning
//! component (a language model) either answers directly or requests a tool call; the
//! loop alternates between reasoning and tool execution, appending to one transcript,
//! until the model answers without requesting tools.
//!
//! ## Design Principles
//!
//! - **Append-only state**: nodes read `&AgentState` and return an `AgentStateUpdate`;
//!   the run loop merges it with the state's reducer (concatenation). Nothing edits or
//!   removes a message.
//! - **Routing on edges**: nodes never pick their successor. An edge is either fixed or
//!   a router plus a branch table, checked when the graph is compiled.
//! - **Bounded runs**: every run has a step limit, an optional deadline and a
//!   cancellation token, since termination depends on an external model.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `GraphState`, `RunnableConfig`.
//! - [`react`]: `AgentNode`, `ToolNode`, `should_continue`, `AgentRunner`, `run_agent`.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, and `ChatOpenAI` (feature `openai`).
//! - [`tool_source`]: `ToolSource` trait, `ToolSpec`, `MockToolSource`.
//! - [`tools`]: `Tool` trait, `ToolRegistry`, `TavilySearchTool` (feature `search`).
//! - [`stream`]: `StreamMode` and `StreamEvent` for `CompiledStateGraph::stream`.
//!
//! ## Features
//!
//! - `openai` (default): OpenAI-compatible chat client (OpenAI, Groq) via `async-openai`.
//! - `search` (default): Tavily web search tool via `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use loopgraph::{run_agent, AgentOptions, MockLlm, MockToolSource};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = Arc::new(MockLlm::search_then_answer("weather in Paris", "18°C and cloudy."));
//! let tools = Arc::new(MockToolSource::default().with_tool_result("search", "18°C"));
//! let state = run_agent("What is the weather in Paris?", llm, tools, AgentOptions::default(), None)
//!     .await
//!     .unwrap();
//! assert_eq!(state.final_answer(), Some("18°C and cloudy."));
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod react;
pub mod state;
pub mod stream;
pub mod tool_source;
pub mod tools;

pub use error::{AgentError, Service};
pub use graph::{
    CompilationError, CompiledStateGraph, GraphState, Next, Node, RetryPolicy, RunContext,
    RunFailure, RunnableConfig, StateGraph, DEFAULT_MAX_STEPS, END, START,
};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{LlmClient, LlmResponse, MockLlm, ToolChoiceMode};
pub use message::{Message, ToolCall};
pub use react::{
    build_agent_graph, run_agent, should_continue, AgentNode, AgentOptions, AgentRunner,
    HandleToolErrors, Route, RunError, ToolCallPolicy, ToolNode,
};
pub use state::{AgentState, AgentStateUpdate};
pub use stream::{StreamEvent, StreamMode};
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
#[cfg(feature = "search")]
pub use tools::TavilySearchTool;
pub use tools::{Tool, ToolRegistry};
pub use tokio_util::sync::CancellationToken;
