//! StateGraph compile failure cases: unknown node, missing entry, bad branches.

use std::sync::Arc;

use loopgraph::{CompilationError, StateGraph, END, START};

use crate::common::{PushNode, Trail};

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn compile_fails_when_entry_is_unknown() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph.set_entry_point("ghost").add_edge("a", END);

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn compile_fails_without_entry() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph.add_edge("a", END);

    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

/// **Scenario**: A branch pointing at an unregistered node is rejected.
#[tokio::test]
async fn compile_fails_on_unknown_branch_target() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph.set_entry_point("a").add_conditional_edges(
        "a",
        |_: &Trail| "go".to_string(),
        [("go".to_string(), "nowhere"), ("stop".to_string(), END)],
    );

    match graph.compile() {
        Err(CompilationError::InvalidConditionalTarget(id)) => assert_eq!(id, "nowhere"),
        other => panic!("expected InvalidConditionalTarget, got {:?}", other.err()),
    }
}

/// **Scenario**: Conditional edges on an unregistered source are rejected.
#[tokio::test]
async fn compile_fails_on_conditional_from_unknown_node() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph
        .set_entry_point("a")
        .add_edge("a", END)
        .add_conditional_edges("ghost", |_: &Trail| 0u8, [(0u8, END)]);

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

/// **Scenario**: An edge into START is never valid.
#[tokio::test]
async fn compile_fails_on_edge_into_start() {
    let mut graph = StateGraph::<Trail>::new();
    graph.add_node("a", Arc::new(PushNode::new("a")));
    graph.set_entry_point("a").add_edge("a", START);

    assert!(matches!(
        graph.compile(),
        Err(CompilationError::InvalidEdges(_))
    ));
}
