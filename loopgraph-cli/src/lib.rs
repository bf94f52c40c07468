//! loopgraph-cli library: env-based config and run entry points for the agent loop.
//!
//! Reads the model endpoint and search key from `.env`, builds the agent ↔ action
//! graph with a chat client and the Tavily search tool, runs it and returns the
//! final transcript.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), loopgraph_cli::Error> {
//! let state = loopgraph_cli::run("What is the weather in Paris?").await?;
//! print!("{}", loopgraph_cli::format_transcript(state.messages()));
//! # Ok(())
//! # }
//! ```

mod config;
mod logging;
mod run;

pub use config::{Error, RunConfig, RunOptions, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use logging::{default_directive, init_tracing};
pub use loopgraph::{AgentState, CancellationToken, Message, RunError, ToolChoiceMode};
pub use run::{format_transcript, run, run_with_config, run_with_options};

#[cfg(test)]
mod tests;
