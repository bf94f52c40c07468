//! Streaming types for graph runs.
//!
//! Defines stream modes and events emitted by `CompiledStateGraph::stream`.

use std::fmt::Debug;

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node completes.
    Values,
    /// Emit incremental updates with node id and state.
    Updates,
}

/// Streamed event emitted while running a graph.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Full state snapshot after a node finishes.
    Values(S),
    /// Incremental update with the node id and state after that node.
    Updates { node_id: String, state: S },
    /// Terminal event of an aborted run: the error message and the partial state.
    /// Always sent on failure, whatever modes were selected.
    Failed { error: String, state: S },
}

impl<S> StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// State carried by the event.
    pub fn state(&self) -> &S {
        match self {
            StreamEvent::Values(state)
            | StreamEvent::Updates { state, .. }
            | StreamEvent::Failed { state, .. } => state,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StreamEvent::Failed { .. })
    }
}
