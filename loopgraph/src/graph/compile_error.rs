//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the wiring is malformed: a missing entry,
//! an edge that references an unknown node, or a node whose successor rule is not
//! exactly one unconditional edge or one conditional edge.

use thiserror::Error;

/// Error when compiling a state graph. Fatal; never retried.
///
/// Validation ensures the entry exists, every edge target is a registered node or
/// `END`, and every node has exactly one successor rule.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No entry point: no `add_edge(START, ..)` / `set_entry_point`.
    #[error("graph must have exactly one entry point (edge from START)")]
    MissingStart,

    /// Neither an edge nor a branch leads to END, so no run can terminate.
    #[error("graph must have at least one edge or branch to END")]
    MissingEnd,

    /// Edges that cannot be part of a well-formed graph (e.g. multiple entries, START → END).
    #[error("invalid edges: {0}")]
    InvalidEdges(String),

    /// A node has more than one unconditional outgoing edge.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A node has no outgoing edge at all.
    #[error("node has no outgoing edge: {0}")]
    MissingSuccessor(String),

    /// A conditional edge was added with an empty branch table.
    #[error("conditional edges of node {0} have no branches")]
    EmptyBranches(String),

    /// A branch target is not a valid node id or END.
    #[error("conditional branch has invalid target: {0}")]
    InvalidConditionalTarget(String),
}
