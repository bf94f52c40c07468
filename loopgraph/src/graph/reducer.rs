//! State reducer: how a node's partial update is merged into the running state.
//!
//! Each graph has one state type `S`. Nodes never mutate `S` directly; they return an
//! `S::Update` and the run loop folds it in with [`GraphState::merge`]. The run loop
//! owns the only copy of the state for the lifetime of a run.

use std::fmt::Debug;

/// State type that can flow through a [`StateGraph`](super::StateGraph).
///
/// `Update` is the partial state a node produces; `merge` is the reducer. For an
/// append-only transcript the reducer is concatenation (see
/// [`AgentState`](crate::AgentState)).
pub trait GraphState: Clone + Send + Sync + Debug + 'static {
    /// Partial update produced by one node invocation.
    type Update: Send + Debug + 'static;

    /// Folds `update` into `self`.
    fn merge(&mut self, update: Self::Update);

    /// Functional form of [`merge`](GraphState::merge): returns the merged value.
    fn reduce(mut self, update: Self::Update) -> Self {
        self.merge(update);
        self
    }
}
