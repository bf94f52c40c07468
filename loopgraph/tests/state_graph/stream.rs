//! CompiledStateGraph::stream: per-step events and the terminal failure event.

use std::collections::HashSet;
use std::sync::Arc;

use loopgraph::{RunnableConfig, StateGraph, StreamEvent, StreamMode, END};
use tokio_stream::StreamExt;

use crate::common::{PushNode, Trail};

fn chain() -> loopgraph::CompiledStateGraph<Trail> {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Arc::new(PushNode::new("a")))
        .add_node("b", Arc::new(PushNode::new("b")))
        .set_entry_point("a")
        .add_edge("a", "b")
        .add_edge("b", END);
    graph.compile().unwrap()
}

/// **Scenario**: Values mode emits the full state after each node.
#[tokio::test]
async fn stream_values_emits_state_after_each_node() {
    let events: Vec<_> = chain()
        .stream(Trail::default(), None, HashSet::from([StreamMode::Values]))
        .collect()
        .await;
    let snapshots: Vec<Vec<&str>> = events
        .iter()
        .map(|e| match e {
            StreamEvent::Values(s) => s.labels(),
            other => panic!("expected Values, got {:?}", other),
        })
        .collect();
    assert_eq!(snapshots, vec![vec!["a"], vec!["a", "b"]]);
}

/// **Scenario**: Both modes emit two events per step; Updates carries the node id.
#[tokio::test]
async fn stream_values_and_updates() {
    let events: Vec<_> = chain()
        .stream(
            Trail::default(),
            None,
            HashSet::from([StreamMode::Values, StreamMode::Updates]),
        )
        .collect()
        .await;
    assert_eq!(events.len(), 4);
    let node_ids: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { node_id, .. } => Some(node_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(node_ids, vec!["a", "b"]);
}

/// **Scenario**: A failing run ends the stream with Failed carrying the partial state.
#[tokio::test]
async fn stream_failure_emits_terminal_failed_event() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Arc::new(PushNode::new("a")))
        .set_entry_point("a")
        .add_conditional_edges("a", |_: &Trail| true, [(true, "a"), (false, END)]);
    let config = RunnableConfig::default().with_max_steps(3);
    let events: Vec<_> = graph
        .compile()
        .unwrap()
        .stream(Trail::default(), Some(config), HashSet::from([StreamMode::Updates]))
        .collect()
        .await;

    assert_eq!(events.len(), 4);
    match events.last() {
        Some(StreamEvent::Failed { error, state }) => {
            assert!(error.contains("step limit"), "{}", error);
            assert_eq!(state.steps.len(), 3);
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}
