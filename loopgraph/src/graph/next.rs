//! Resolved successor of a node: another node, or the terminal sentinel.

use std::fmt;

use super::state_graph::END;

/// Where control goes after a node has run and its update was merged.
///
/// **Interaction**: Produced by the compiled graph from its edge table (and the
/// router for conditional edges); consumed by the run loop and by logging.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Run the node with the given id next.
    Node(String),
    /// Stop and return the current state.
    End,
}

impl Next {
    /// Maps an edge target (a node id or [`END`]) to `Next`.
    pub fn from_target(target: &str) -> Self {
        if target == END {
            Next::End
        } else {
            Next::Node(target.to_string())
        }
    }
}

impl fmt::Display for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Next::Node(id) => write!(f, "{}", id),
            Next::End => write!(f, "{}", END),
        }
    }
}
