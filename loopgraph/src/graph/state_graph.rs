//! State graph: nodes + explicit edges (from → to) and conditional edges.
//!
//! Add nodes with `add_node`, set the entry with `set_entry_point` (or
//! `add_edge(START, id)`), wire successors with `add_edge(from, to)` or
//! `add_conditional_edges(from, router, branches)`, then `compile` to get a
//! `CompiledStateGraph`. Cycles are allowed; the run loop bounds them with
//! `RunnableConfig::max_steps`.
//!
//! Every node must have exactly one successor rule: one unconditional edge or one
//! conditional edge, never both and never none.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::conditional::{ConditionalRouter, NextEntry};
use crate::graph::node::Node;
use crate::graph::retry::RetryPolicy;
use crate::graph::GraphState;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as a target in `add_edge` or a conditional branch.
pub const END: &str = "__end__";

/// State graph: nodes plus explicit edges and conditional edges.
///
/// Generic over state type `S`. The builder is mutable only until `compile`,
/// which consumes it; the compiled graph is immutable.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edges (from_id, to_id). `from_id == START` marks the entry.
    edges: Vec<(String, String)>,
    /// Conditional edges: source node id -> router with branch table.
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    /// Retry policy for node execution. Default is `RetryPolicy::None`.
    retry_policy: RetryPolicy,
}

impl<S> Default for StateGraph<S>
where
    S: GraphState,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: GraphState,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            retry_policy: RetryPolicy::None,
        }
    }

    /// Attaches a retry policy for transient node failures.
    pub fn with_retry_policy(self, retry_policy: RetryPolicy) -> Self {
        Self {
            retry_policy,
            ..self
        }
    }

    /// Adds a node; replaces any node registered under the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Marks `id` as the entry node. Same as `add_edge(START, id)`.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(START, id)
    }

    /// Adds an unconditional edge from `from_id` to `to_id`.
    ///
    /// Use `START` for the entry and `END` for exit. Both ids (except START/END) must be
    /// registered via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds a conditional edge from `source`.
    ///
    /// After `source` runs and its update is merged, `router(&state)` yields a label
    /// that is looked up in `branches` to get the next node id (or `END`). A label with
    /// no branch fails the run with `AgentError::Routing`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "agent",
    ///     should_continue,
    ///     [(Route::Continue, "action"), (Route::End, END)],
    /// );
    /// ```
    pub fn add_conditional_edges<L, F, I, T>(
        &mut self,
        source: impl Into<String>,
        router: F,
        branches: I,
    ) -> &mut Self
    where
        L: Eq + Hash + Debug + Send + Sync + 'static,
        F: Fn(&S) -> L + Send + Sync + 'static,
        I: IntoIterator<Item = (L, T)>,
        T: Into<String>,
    {
        let branches: HashMap<L, String> = branches
            .into_iter()
            .map(|(label, target)| (label, target.into()))
            .collect();
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(router, branches));
        self
    }

    /// Validates the wiring and builds the executable graph.
    ///
    /// Returns `CompilationError` if the entry is missing, an edge references an unknown
    /// node, or a node does not have exactly one successor rule. On success the graph is
    /// immutable and ready for `invoke`.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        let mut entries = Vec::new();
        for (from, to) in &self.edges {
            if to == START {
                return Err(CompilationError::InvalidEdges(format!(
                    "edge {} -> START",
                    from
                )));
            }
            if from == START {
                if to == END {
                    return Err(CompilationError::InvalidEdges(
                        "START cannot lead directly to END".into(),
                    ));
                }
                entries.push(to.clone());
            } else if !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }

        let entry = match entries.len() {
            0 => return Err(CompilationError::MissingStart),
            1 => entries.remove(0),
            _ => {
                return Err(CompilationError::InvalidEdges(
                    "multiple edges from START".into(),
                ))
            }
        };

        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if router.targets.is_empty() {
                return Err(CompilationError::EmptyBranches(source.clone()));
            }
            for target in &router.targets {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(CompilationError::InvalidConditionalTarget(target.clone()));
                }
            }
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if self.conditional_edges.contains_key(from) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(from.clone()));
            }
            if next_map
                .insert(from.clone(), NextEntry::Unconditional(to.clone()))
                .is_some()
            {
                return Err(CompilationError::DuplicateEdge(from.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            next_map.insert(source.clone(), NextEntry::Conditional(router.clone()));
        }

        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();
        if let Some(id) = ids.into_iter().find(|id| !next_map.contains_key(*id)) {
            return Err(CompilationError::MissingSuccessor(id.clone()));
        }

        let reaches_end = next_map.values().any(|entry| match entry {
            NextEntry::Unconditional(to) => to == END,
            NextEntry::Conditional(router) => router.targets.iter().any(|t| t == END),
        });
        if !reaches_end {
            return Err(CompilationError::MissingEnd);
        }

        let reachable = reachable_from(&entry, &next_map);
        for id in self.nodes.keys().filter(|id| !reachable.contains(*id)) {
            tracing::warn!(node_id = %id, "node is unreachable from the entry point");
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            next_map,
            retry_policy: self.retry_policy,
        })
    }
}

/// Node ids reachable from `entry` following every edge and branch.
fn reachable_from<S>(entry: &str, next_map: &HashMap<String, NextEntry<S>>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack = vec![entry.to_string()];
    while let Some(id) = stack.pop() {
        if id == END || !seen.insert(id.clone()) {
            continue;
        }
        match next_map.get(&id) {
            Some(NextEntry::Unconditional(to)) => stack.push(to.clone()),
            Some(NextEntry::Conditional(router)) => stack.extend(router.targets.iter().cloned()),
            None => {}
        }
    }
    seen
}
