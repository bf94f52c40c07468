//! Graph node trait: one named step in a StateGraph.
//!
//! A node reads the current state and returns a partial update; it does not decide
//! where control goes next. Routing is a property of the graph's edges.

use async_trait::async_trait;

use crate::error::AgentError;

use super::{GraphState, RunContext};

/// One step in a graph: `&state` in, partial update out.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by the
/// `CompiledStateGraph` run loop, which merges the returned update via
/// [`GraphState::merge`] and then resolves the outgoing edge.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: GraphState,
{
    /// Node id (e.g. `"agent"`, `"action"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: read `state`, return the update to merge.
    async fn run(&self, state: &S) -> Result<S::Update, AgentError>;

    /// Variant with run context (config, cancellation token, stream sender).
    ///
    /// The run loop always calls this; the default ignores the context and calls `run`.
    async fn run_with_context(
        &self,
        state: &S,
        _ctx: &RunContext<S>,
    ) -> Result<S::Update, AgentError> {
        self.run(state).await
    }
}
