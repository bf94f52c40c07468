//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/end, node start/finish, state merges and
//! routing decisions. Installing a subscriber is left to the binary.

use super::Next;

/// Log graph execution start.
pub fn log_graph_start(entry: &str, run_id: Option<&str>, max_steps: usize) {
    tracing::info!(entry, run_id, max_steps, "Starting graph execution");
}

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id, step, "Starting node execution");
}

/// Log a retry of a failed node.
pub fn log_node_retry(node_id: &str, attempt: usize, error: &crate::error::AgentError) {
    tracing::warn!(node_id, attempt, %error, "Retrying node after transient failure");
}

/// Log state update after merging a node's output.
pub fn log_state_update(node_id: &str, update: &dyn std::fmt::Debug) {
    tracing::trace!(node_id, ?update, "State updated");
}

/// Log the resolved successor of a node.
pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id, %next, "Node execution complete");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &crate::error::AgentError, steps: usize) {
    tracing::error!(%error, steps, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These should not panic without a subscriber installed
        log_graph_start("agent", Some("r1"), 25);
        log_node_start("test_node", 0);
        log_node_retry("test_node", 1, &crate::error::AgentError::tool("flaky"));
        log_state_update("test_node", &vec!["m"]);
        log_node_complete("test_node", &Next::End);
        log_node_complete("test_node", &Next::Node("other".into()));
        log_graph_complete(2);
        log_graph_error(&crate::error::AgentError::Cancelled, 1);
    }
}
