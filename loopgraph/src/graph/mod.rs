//! State graph: nodes, edges and conditional edges; compile, then invoke or stream.
//!
//! Build a [`StateGraph`], register nodes with `add_node`, wire them with `add_edge` /
//! `add_conditional_edges`, then `compile` into a [`CompiledStateGraph`]. Nodes return
//! partial updates that are merged through [`GraphState::merge`]; routing is decided
//! by the edges, never by the nodes.

mod compile_error;
mod compiled;
mod conditional;
mod config;
pub mod logging;
mod next;
mod node;
mod reducer;
mod retry;
mod run_context;
mod run_failure;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, NextEntry};
pub use config::{RunnableConfig, DEFAULT_MAX_STEPS};
pub use next::Next;
pub use node::Node;
pub use reducer::GraphState;
pub use retry::RetryPolicy;
pub use run_context::RunContext;
pub use run_failure::RunFailure;
pub use state_graph::{StateGraph, END, START};
