//! Run guards: step limit, deadline, cancellation and retry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use loopgraph::{
    AgentError, CancellationToken, RetryPolicy, RunnableConfig, StateGraph, DEFAULT_MAX_STEPS,
    END,
};

use crate::common::{FailNode, PushNode, SleepNode, Trail};

fn endless() -> loopgraph::CompiledStateGraph<Trail> {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("spin", Arc::new(PushNode::new("spin")))
        .set_entry_point("spin")
        .add_conditional_edges("spin", |_: &Trail| true, [(true, "spin"), (false, END)]);
    graph.compile().unwrap()
}

fn sleeper(delay: Duration) -> (Arc<SleepNode>, loopgraph::CompiledStateGraph<Trail>) {
    let node = Arc::new(SleepNode::new(delay));
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("sleep", node.clone())
        .set_entry_point("sleep")
        .add_conditional_edges("sleep", |_: &Trail| true, [(true, "sleep"), (false, END)]);
    (node, graph.compile().unwrap())
}

/// **Scenario**: Without a config the default step limit stops an endless loop.
#[tokio::test]
async fn default_step_limit_stops_endless_loop() {
    let failure = endless().invoke(Trail::default(), None).await.unwrap_err();
    assert!(matches!(
        failure.error,
        AgentError::StepLimitExceeded(n) if n == DEFAULT_MAX_STEPS
    ));
    assert_eq!(failure.steps, DEFAULT_MAX_STEPS);
    assert_eq!(failure.state.steps.len(), DEFAULT_MAX_STEPS);
}

/// **Scenario**: max_steps = 0 fails before running any node.
#[tokio::test]
async fn zero_step_limit_runs_nothing() {
    let config = RunnableConfig::default().with_max_steps(0);
    let failure = endless()
        .invoke(Trail::default(), Some(config))
        .await
        .unwrap_err();
    assert!(matches!(failure.error, AgentError::StepLimitExceeded(0)));
    assert!(failure.state.steps.is_empty());
}

/// **Scenario**: A run slower than its timeout fails with DeadlineExceeded, keeping merged steps.
#[tokio::test]
async fn timeout_aborts_run() {
    let (_, graph) = sleeper(Duration::from_millis(20));
    let config = RunnableConfig::default()
        .with_max_steps(1_000)
        .with_timeout(Duration::from_millis(70));
    let failure = graph
        .invoke(Trail::default(), Some(config))
        .await
        .unwrap_err();
    assert!(matches!(
        failure.error,
        AgentError::DeadlineExceeded(d) if d == Duration::from_millis(70)
    ));
    assert!(failure.steps >= 1, "steps: {}", failure.steps);
    assert_eq!(failure.state.steps.len(), failure.steps);
}

/// **Scenario**: Cancelling the token interrupts the in-flight node.
#[tokio::test]
async fn cancellation_interrupts_in_flight_node() {
    let (node, graph) = sleeper(Duration::from_secs(30));
    let token = CancellationToken::new();
    let config = RunnableConfig::default().with_cancellation(token.clone());

    let run = tokio::spawn(async move { graph.invoke(Trail::default(), Some(config)).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let failure = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("cancelled run returns promptly")
        .unwrap()
        .unwrap_err();
    assert!(matches!(failure.error, AgentError::Cancelled));
    assert_eq!(failure.steps, 0);
    assert_eq!(node.completed.load(Ordering::SeqCst), 0);
}

/// **Scenario**: A token cancelled before the run starts fails without running anything.
#[tokio::test]
async fn pre_cancelled_token_runs_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let failure = endless()
        .invoke(
            Trail::default(),
            Some(RunnableConfig::default().with_cancellation(token)),
        )
        .await
        .unwrap_err();
    assert!(matches!(failure.error, AgentError::Cancelled));
    assert!(failure.state.steps.is_empty());
}

/// **Scenario**: Retry applies to transient failures only and gives up after max_attempts.
#[tokio::test]
async fn retry_only_transient_and_bounded() {
    let transient = Arc::new(FailNode {
        error: || AgentError::reasoning("429 Too Many Requests"),
        calls: AtomicUsize::new(0),
    });
    let mut graph = StateGraph::<Trail>::new()
        .with_retry_policy(RetryPolicy::fixed(2, Duration::from_millis(1)));
    graph
        .add_node("fail", transient.clone())
        .set_entry_point("fail")
        .add_edge("fail", END);
    let failure = graph
        .compile()
        .unwrap()
        .invoke(Trail::default(), None)
        .await
        .unwrap_err();
    assert!(failure.error.is_transient());
    assert_eq!(transient.calls.load(Ordering::SeqCst), 3);

    let fatal = Arc::new(FailNode {
        error: || AgentError::ContractViolation {
            node: "fail".into(),
            message: "bad wiring".into(),
        },
        calls: AtomicUsize::new(0),
    });
    let mut graph = StateGraph::<Trail>::new()
        .with_retry_policy(RetryPolicy::fixed(5, Duration::from_millis(1)));
    graph
        .add_node("fail", fatal.clone())
        .set_entry_point("fail")
        .add_edge("fail", END);
    let failure = graph
        .compile()
        .unwrap()
        .invoke(Trail::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(failure.error, AgentError::ContractViolation { .. }));
    assert_eq!(fatal.calls.load(Ordering::SeqCst), 1);
}
