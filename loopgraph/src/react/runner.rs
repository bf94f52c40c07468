//! Agent graph runner: encapsulates graph build, initial state, invoke and stream.
//!
//! Used by loopgraph-cli and any caller that wants to run the agent ↔ action loop
//! without wiring the graph by hand. Interacts with
//! [`StateGraph`](crate::graph::StateGraph), [`AgentNode`](super::AgentNode),
//! [`ToolNode`](super::ToolNode) and [`should_continue`](super::should_continue).

use std::collections::HashSet;
use std::sync::Arc;

use tokio_stream::StreamExt;

use crate::graph::{
    CompilationError, CompiledStateGraph, RetryPolicy, RunFailure, RunnableConfig, StateGraph,
    END,
};
use crate::llm::LlmClient;
use crate::state::AgentState;
use crate::stream::{StreamEvent, StreamMode};
use crate::tool_source::{ToolSource, ToolSourceError, ToolSpec};

use super::{
    should_continue, AgentNode, HandleToolErrors, Route, ToolCallPolicy, ToolNode, ACTION_NODE,
    AGENT_NODE,
};

/// Knobs of the agent graph that are fixed at build time.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub tool_call_policy: ToolCallPolicy,
    pub handle_tool_errors: HandleToolErrors,
    /// Retries transient service failures of either node.
    pub retry_policy: RetryPolicy,
}

/// Builds and compiles the agent ↔ action graph.
///
/// Wiring: entry `agent`; `agent --Continue--> action`, `agent --End--> END`;
/// `action --> agent`.
///
/// # Errors
///
/// Returns `CompilationError` if the wiring is invalid (never for this fixed graph,
/// but compile is the single validation point).
pub fn build_agent_graph(
    llm: Arc<dyn LlmClient>,
    tool_specs: Vec<ToolSpec>,
    tools: Arc<dyn ToolSource>,
    options: &AgentOptions,
) -> Result<CompiledStateGraph<AgentState>, CompilationError> {
    let agent = AgentNode::new(llm, tool_specs);
    let action = ToolNode::new(tools)
        .with_policy(options.tool_call_policy)
        .with_handle_tool_errors(options.handle_tool_errors.clone());

    let mut graph =
        StateGraph::<AgentState>::new().with_retry_policy(options.retry_policy.clone());
    graph
        .add_node(AGENT_NODE, Arc::new(agent))
        .add_node(ACTION_NODE, Arc::new(action))
        .set_entry_point(AGENT_NODE)
        .add_conditional_edges(
            AGENT_NODE,
            should_continue,
            [(Route::Continue, ACTION_NODE), (Route::End, END)],
        )
        .add_edge(ACTION_NODE, AGENT_NODE);
    graph.compile()
}

/// Error type for AgentRunner invoke/stream operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("listing tools failed: {0}")]
    Tools(#[from] ToolSourceError),
    #[error("execution failed: {0}")]
    Execution(#[from] RunFailure<AgentState>),
    #[error("execution failed: {error}")]
    StreamFailed { error: String, state: AgentState },
    #[error("stream ended without final state")]
    StreamEndedWithoutState,
}

impl RunError {
    /// Transcript accumulated before the failure, when the run got that far.
    pub fn partial_state(&self) -> Option<&AgentState> {
        match self {
            RunError::Execution(failure) => Some(&failure.state),
            RunError::StreamFailed { state, .. } => Some(state),
            _ => None,
        }
    }
}

/// Runs the agent loop once for `user_message` and returns the final transcript.
///
/// # Errors
///
/// See [`RunError`]; on `Execution` the partial transcript is in the failure.
pub async fn run_agent(
    user_message: &str,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    options: AgentOptions,
    runnable_config: Option<RunnableConfig>,
) -> Result<AgentState, RunError> {
    let runner = AgentRunner::new(llm, tools, options, runnable_config).await?;
    runner.invoke(user_message).await
}

/// Agent graph runner: the compiled graph plus the per-run config template.
///
/// The compiled graph is immutable; one runner (or clones of it) can serve
/// concurrent runs, each with its own fresh `AgentState`.
///
/// # Example
///
/// ```ignore
/// let runner = AgentRunner::new(llm, tools, AgentOptions::default(), None).await?;
/// let state = runner.invoke("What is the weather in Paris?").await?;
/// ```
#[derive(Clone)]
pub struct AgentRunner {
    compiled: CompiledStateGraph<AgentState>,
    runnable_config: Option<RunnableConfig>,
}

impl AgentRunner {
    /// Lists the tools once, builds the graph and keeps `runnable_config` for every run.
    pub async fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        options: AgentOptions,
        runnable_config: Option<RunnableConfig>,
    ) -> Result<Self, RunError> {
        let specs = tools.list_tools().await?;
        tracing::debug!(tools = specs.len(), "building agent graph");
        let compiled = build_agent_graph(llm, specs, tools, &options)?;
        Ok(Self {
            compiled,
            runnable_config,
        })
    }

    pub fn graph(&self) -> &CompiledStateGraph<AgentState> {
        &self.compiled
    }

    /// Invokes the graph with a fresh state seeded with `user_message`.
    pub async fn invoke(&self, user_message: &str) -> Result<AgentState, RunError> {
        self.invoke_with_config(user_message, self.runnable_config.clone())
            .await
    }

    /// Same as [`invoke`](Self::invoke) with a per-run config (e.g. its own cancellation token).
    pub async fn invoke_with_config(
        &self,
        user_message: &str,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        let state = AgentState::new(user_message);
        Ok(self.compiled.invoke(state, config).await?)
    }

    /// Streams the run; returns the final state from the last `StreamEvent::Values`.
    ///
    /// When `on_event` is provided, invokes it for each event so the caller can print
    /// progress (e.g. each appended message).
    pub async fn stream_with_callback<F>(
        &self,
        user_message: &str,
        mut on_event: Option<F>,
    ) -> Result<AgentState, RunError>
    where
        F: FnMut(&StreamEvent<AgentState>),
    {
        let modes = HashSet::from([StreamMode::Updates, StreamMode::Values]);
        let mut stream = self.compiled.stream(
            AgentState::new(user_message),
            self.runnable_config.clone(),
            modes,
        );

        let mut final_state: Option<AgentState> = None;
        while let Some(event) = stream.next().await {
            if let Some(ref mut f) = on_event {
                f(&event);
            }
            match event {
                StreamEvent::Values(s) => final_state = Some(s),
                StreamEvent::Failed { error, state } => {
                    return Err(RunError::StreamFailed { error, state })
                }
                StreamEvent::Updates { .. } => {}
            }
        }

        final_state.ok_or(RunError::StreamEndedWithoutState)
    }
}
