//! Conditional edges: route to the next node based on state.
//!
//! A source node has a routing function `(state) -> label` and a branch table
//! `label -> node id | END`. The label type is chosen by the caller; a closed enum
//! (like [`Route`](crate::react::Route)) makes an unknown label impossible, while
//! open label types (e.g. `String`) are checked at run time and fail with
//! [`AgentError::Routing`](crate::AgentError::Routing).
//!
//! **Interaction**: Built by `StateGraph::add_conditional_edges`; resolved by the
//! `CompiledStateGraph` run loop after the source node's update has been merged.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Type-erased branch lookup: `Ok(target)` or `Err(label rendered with Debug)`.
type ResolveFn<S> = Arc<dyn Fn(&S) -> Result<String, String> + Send + Sync>;

/// Conditional edge definition: router plus branch table, with the label type erased.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    resolve: ResolveFn<S>,
    /// Every target named in the branch table; checked by `compile`.
    pub(super) targets: Vec<String>,
}

impl<S> ConditionalRouter<S>
where
    S: Send + Sync + 'static,
{
    /// Builds a conditional router from a routing function and its branch table.
    pub fn new<L, F>(router: F, branches: HashMap<L, String>) -> Self
    where
        L: Eq + Hash + Debug + Send + Sync + 'static,
        F: Fn(&S) -> L + Send + Sync + 'static,
    {
        let targets = branches.values().cloned().collect();
        let resolve: ResolveFn<S> = Arc::new(move |state: &S| {
            let label = router(state);
            branches
                .get(&label)
                .cloned()
                .ok_or_else(|| format!("{:?}", label))
        });
        Self { resolve, targets }
    }

    /// Calls the router and looks the label up in the branch table.
    ///
    /// Returns the target node id (or `END`); `Err` carries the unmatched label.
    pub fn resolve_next(&self, state: &S) -> Result<String, String> {
        (self.resolve)(state)
    }
}

/// How to determine the next node after a given node runs.
///
/// Stored in the compiled graph's next map, one entry per node.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed next node (or END).
    Unconditional(String),
    /// Next node is decided by the router from the merged state.
    Conditional(ConditionalRouter<S>),
}
