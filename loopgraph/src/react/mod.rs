//! The agent loop: reasoning node, tool node, router and runner.
//!
//! Two nodes implementing `Node<AgentState>` wired into a cycle:
//! `agent --Continue--> action --> agent`, with `agent --End--> END`.

mod agent_node;
mod router;
mod runner;
mod tool_node;

pub use agent_node::AgentNode;
pub use router::{should_continue, Route};
pub use runner::{build_agent_graph, run_agent, AgentOptions, AgentRunner, RunError};
pub use tool_node::{
    ErrorHandlerFn, HandleToolErrors, ToolCallPolicy, ToolNode, DEFAULT_EXECUTION_ERROR_TEMPLATE,
    DEFAULT_TOOL_ERROR_TEMPLATE,
};

/// Id of the reasoning node.
pub const AGENT_NODE: &str = "agent";

/// Id of the tool-execution node.
pub const ACTION_NODE: &str = "action";
