//! Run entry points: run with env config, run_with_options, or run_with_config.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`], [`format_transcript`]
//! and [`Error`].

pub use crate::config::Error;

mod transcript;

use std::sync::Arc;

use loopgraph::{AgentRunner, AgentState, CancellationToken, LlmClient, ToolSource};

use crate::config::{RunConfig, RunOptions};

pub use transcript::format_transcript;

/// Run the agent with config from env (and `.env`), returns the final transcript.
pub async fn run(user_message: &str) -> Result<AgentState, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, user_message, CancellationToken::new()).await
}

/// Run the agent with config from env plus `options` on top.
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, then calls
/// [`run_with_config`].
pub async fn run_with_options(
    user_message: &str,
    options: &RunOptions,
) -> Result<AgentState, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, user_message, CancellationToken::new()).await
}

/// Run the agent with an explicit config; `cancellation` stops the run between or
/// during steps.
///
/// Builds the chat client and the search tool from `config`. A failed run comes
/// back as a boxed [`loopgraph::RunError`]; downcast it to reach the partial
/// transcript.
pub async fn run_with_config(
    config: &RunConfig,
    user_message: &str,
    cancellation: CancellationToken,
) -> Result<AgentState, Error> {
    let llm = Arc::new(config.chat_client());
    let tools = Arc::new(config.search_tools()?);
    tracing::info!(
        model = %config.model,
        api_base = %config.api_base,
        max_steps = config.max_steps,
        timeout = ?config.timeout,
        "starting agent run"
    );
    run_with_clients(config, llm, tools, user_message, cancellation).await
}

/// Shared tail of the entry points with the clients already built.
pub(crate) async fn run_with_clients(
    config: &RunConfig,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    user_message: &str,
    cancellation: CancellationToken,
) -> Result<AgentState, Error> {
    let runner = AgentRunner::new(
        llm,
        tools,
        config.agent_options(),
        Some(config.runnable_config(cancellation)),
    )
    .await?;
    let state = runner.invoke(user_message).await?;
    tracing::info!(messages = state.len(), "agent run finished");
    Ok(state)
}
