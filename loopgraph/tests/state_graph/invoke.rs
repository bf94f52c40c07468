//! StateGraph invoke: linear chains, conditional loops, routing failures, shared graphs.

use std::collections::HashMap;
use std::sync::Arc;

use loopgraph::{AgentError, RunnableConfig, StateGraph, END};

use crate::common::{PushNode, StepProbe, Trail};

/// **Scenario**: Linear chain a -> b -> END appends in execution order.
#[tokio::test]
async fn invoke_linear_chain_appends_in_order() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Arc::new(PushNode::new("a")))
        .add_node("b", Arc::new(PushNode::new("b")))
        .set_entry_point("a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled.invoke(Trail::default(), None).await.unwrap();
    assert_eq!(out.labels(), vec!["a", "b"]);
}

/// **Scenario**: The router sees the merged state of the node it follows.
#[tokio::test]
async fn invoke_cycle_until_router_ends() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("think", Arc::new(PushNode::new("think")))
        .add_node("act", Arc::new(PushNode::new("act")))
        .set_entry_point("think")
        .add_conditional_edges(
            "think",
            |s: &Trail| s.steps.iter().filter(|l| *l == "think").count() < 3,
            [(true, "act"), (false, END)],
        )
        .add_edge("act", "think");
    let compiled = graph.compile().unwrap();

    let out = compiled.invoke(Trail::default(), None).await.unwrap();
    assert_eq!(
        out.labels(),
        vec!["think", "act", "think", "act", "think"]
    );
}

/// **Scenario**: An open label type with an unmatched label fails with Routing and keeps
/// the state merged before routing.
#[tokio::test]
async fn invoke_unknown_label_is_routing_error() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Arc::new(PushNode::new("a")))
        .add_node("b", Arc::new(PushNode::new("b")))
        .set_entry_point("a")
        .add_conditional_edges(
            "a",
            |_: &Trail| "maybe".to_string(),
            HashMap::from([
                ("continue".to_string(), "b".to_string()),
                ("end".to_string(), END.to_string()),
            ]),
        )
        .add_edge("b", END);
    let compiled = graph.compile().unwrap();

    let failure = compiled.invoke(Trail::default(), None).await.unwrap_err();
    match &failure.error {
        AgentError::Routing { node, label } => {
            assert_eq!(node, "a");
            assert!(label.contains("maybe"), "{}", label);
        }
        other => panic!("expected Routing, got {:?}", other),
    }
    assert_eq!(failure.state.labels(), vec!["a"]);
    assert_eq!(failure.steps, 1);
}

/// **Scenario**: Nodes see the zero-based step number through the run context.
#[tokio::test]
async fn invoke_passes_step_in_run_context() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("probe", Arc::new(StepProbe))
        .set_entry_point("probe")
        .add_conditional_edges(
            "probe",
            |s: &Trail| s.steps.len() < 3,
            [(true, "probe"), (false, END)],
        );
    let out = graph
        .compile()
        .unwrap()
        .invoke(Trail::default(), Some(RunnableConfig::default().with_run_id("probe-run")))
        .await
        .unwrap();
    assert_eq!(out.labels(), vec!["probe@0", "probe@1", "probe@2"]);
}

/// **Scenario**: One compiled graph serves concurrent runs, each with its own state.
#[tokio::test]
async fn compiled_graph_is_shared_across_concurrent_runs() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Arc::new(PushNode::new("a")))
        .set_entry_point("a")
        .add_conditional_edges(
            "a",
            |s: &Trail| s.steps.len() < 4,
            [(true, "a"), (false, END)],
        );
    let compiled = Arc::new(graph.compile().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let compiled = Arc::clone(&compiled);
            tokio::spawn(async move {
                let seed = Trail {
                    steps: vec![format!("seed-{}", i)],
                };
                compiled.invoke(seed, None).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(out.steps[0], format!("seed-{}", i));
        assert_eq!(out.steps.len(), 4);
    }
}
