//! Routing decision after the agent node: run a tool, or stop.

use std::fmt;

use crate::state::AgentState;

/// Branch label of the agent's conditional edge.
///
/// A closed enum: every value has a branch in [`build_agent_graph`](super::build_agent_graph),
/// so routing after the agent node cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The last model message requested tools; go to the action node.
    Continue,
    /// The model answered; the run ends.
    End,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Continue => "continue",
            Route::End => "end",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `End` iff the last message is not a `Model` message with at least one tool call.
pub fn should_continue(state: &AgentState) -> Route {
    let route = match state.pending_tool_calls() {
        Some(_) => Route::Continue,
        None => Route::End,
    };
    tracing::info!(decision = %route, "routing decision");
    route
}
