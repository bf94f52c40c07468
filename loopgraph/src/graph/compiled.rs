//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds the nodes, the entry id and one successor
//! rule per node. Runs from the entry node; after each node the update is merged and
//! the outgoing edge (fixed, or router + branch table) picks the next node.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::conditional::NextEntry;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_retry,
    log_node_start, log_state_update,
};
use super::retry::RetryPolicy;
use super::{GraphState, Next, Node, RunContext, RunFailure, RunnableConfig};

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Created by `StateGraph::compile()`. Cheap to clone (nodes and routers are behind
/// `Arc`); one compiled graph can serve many concurrent runs, each owning its state.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) retry_policy: RetryPolicy,
}

impl<S> CompiledStateGraph<S>
where
    S: GraphState,
{
    /// Id of the first node to run.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Ids of all registered nodes, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Shared run loop used by invoke() and stream(): steps through nodes until END.
    ///
    /// `state` and `ctx.step` reflect every merged update even when this returns `Err`,
    /// so the caller can report the partial state.
    async fn run_loop_inner(&self, state: &mut S, ctx: &mut RunContext<S>) -> Result<(), AgentError> {
        let mut current_id = self.entry.clone();
        loop {
            if ctx.step >= ctx.config.max_steps {
                return Err(AgentError::StepLimitExceeded(ctx.config.max_steps));
            }
            if ctx.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            let node = self
                .nodes
                .get(&current_id)
                .cloned()
                .ok_or_else(|| AgentError::ContractViolation {
                    node: current_id.clone(),
                    message: "node is not registered in the compiled graph".into(),
                })?;

            log_node_start(&current_id, ctx.step);
            let update = self.run_node(&current_id, node.as_ref(), state, ctx).await?;
            log_state_update(&current_id, &update);
            state.merge(update);
            ctx.step += 1;

            ctx.emit(StreamMode::Values, StreamEvent::Values(state.clone()))
                .await;
            ctx.emit(
                StreamMode::Updates,
                StreamEvent::Updates {
                    node_id: current_id.clone(),
                    state: state.clone(),
                },
            )
            .await;

            let next = self.resolve_next(&current_id, state)?;
            log_node_complete(&current_id, &next);
            match next {
                Next::End => return Ok(()),
                Next::Node(id) => current_id = id,
            }
        }
    }

    /// Runs one node, racing it against cancellation and retrying transient failures.
    async fn run_node(
        &self,
        node_id: &str,
        node: &dyn Node<S>,
        state: &S,
        ctx: &RunContext<S>,
    ) -> Result<S::Update, AgentError> {
        let cancellation = ctx.config.cancellation.clone();
        let mut attempt = 0;
        loop {
            let result = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(AgentError::Cancelled),
                result = node.run_with_context(state, ctx) => result,
            };
            match result {
                Ok(update) => return Ok(update),
                Err(e) if e.is_transient() && self.retry_policy.should_retry(attempt) => {
                    log_node_retry(node_id, attempt + 1, &e);
                    let delay = self.retry_policy.delay(attempt);
                    tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => return Err(AgentError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Looks up the successor rule of `node_id` and evaluates it against `state`.
    fn resolve_next(&self, node_id: &str, state: &S) -> Result<Next, AgentError> {
        match self.next_map.get(node_id) {
            Some(NextEntry::Unconditional(to)) => Ok(Next::from_target(to)),
            Some(NextEntry::Conditional(router)) => router
                .resolve_next(state)
                .map(|to| Next::from_target(&to))
                .map_err(|label| AgentError::Routing {
                    node: node_id.to_string(),
                    label,
                }),
            None => Err(AgentError::ContractViolation {
                node: node_id.to_string(),
                message: "node has no successor rule".into(),
            }),
        }
    }

    /// Runs the loop under the step limit, deadline and cancellation of `ctx.config`.
    async fn execute(&self, state: &mut S, ctx: &mut RunContext<S>) -> Result<(), AgentError> {
        log_graph_start(
            &self.entry,
            ctx.config.run_id.as_deref(),
            ctx.config.max_steps,
        );
        let result = match ctx.config.timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.run_loop_inner(state, ctx)).await {
                    Ok(result) => result,
                    Err(_) => Err(AgentError::DeadlineExceeded(timeout)),
                }
            }
            None => self.run_loop_inner(state, ctx).await,
        };
        match &result {
            Ok(()) => log_graph_complete(ctx.step),
            Err(e) => log_graph_error(e, ctx.step),
        }
        result
    }

    /// Runs the graph from the entry node until a transition to END.
    ///
    /// Pass `None` for config to use `RunnableConfig::default()` (25 steps, no
    /// deadline). On failure the returned [`RunFailure`] carries the error, the state
    /// as of the last merged update and the number of completed steps.
    pub async fn invoke(
        &self,
        state: S,
        config: Option<RunnableConfig>,
    ) -> Result<S, RunFailure<S>> {
        let mut state = state;
        let mut ctx = RunContext::new(config.unwrap_or_default());
        match self.execute(&mut state, &mut ctx).await {
            Ok(()) => Ok(state),
            Err(error) => Err(RunFailure {
                error,
                state,
                steps: ctx.step,
            }),
        }
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// Emits `Values` and/or `Updates` after every step per `stream_mode`; a failed run
    /// ends with one `Failed` event regardless of mode. The stream closes when the run
    /// finishes.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let mut ctx = RunContext::new(config.unwrap_or_default());
        ctx.stream_tx = Some(tx.clone());
        ctx.stream_mode = stream_mode.into();

        tokio::spawn(async move {
            let mut state = state;
            if let Err(e) = graph.execute(&mut state, &mut ctx).await {
                let _ = tx
                    .send(StreamEvent::Failed {
                        error: e.to_string(),
                        state,
                    })
                    .await;
            }
        });

        ReceiverStream::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_stream::StreamExt;

    use crate::graph::{StateGraph, END};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Counter(i32);

    impl GraphState for Counter {
        type Update = i32;
        fn merge(&mut self, delta: i32) {
            self.0 += delta;
        }
    }

    struct AddNode {
        id: &'static str,
        delta: i32,
    }

    #[async_trait]
    impl Node<Counter> for AddNode {
        fn id(&self) -> &str {
            self.id
        }
        async fn run(&self, _state: &Counter) -> Result<i32, AgentError> {
            Ok(self.delta)
        }
    }

    /// Fails with a transient error `failures` times, then succeeds.
    struct FlakyNode {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Node<Counter> for FlakyNode {
        fn id(&self) -> &str {
            "flaky"
        }
        async fn run(&self, _state: &Counter) -> Result<i32, AgentError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(AgentError::tool("temporarily unavailable"))
            } else {
                Ok(1)
            }
        }
    }

    fn loop_until(limit: i32) -> CompiledStateGraph<Counter> {
        let mut g = StateGraph::<Counter>::new();
        g.add_node("inc", Arc::new(AddNode { id: "inc", delta: 1 }))
            .set_entry_point("inc")
            .add_conditional_edges(
                "inc",
                move |s: &Counter| s.0 < limit,
                [(true, "inc"), (false, END)],
            );
        g.compile().expect("graph compiles")
    }

    /// **Scenario**: A self-loop runs until the router picks END.
    #[tokio::test]
    async fn invoke_loops_until_router_ends() {
        let out = loop_until(3).invoke(Counter(0), None).await.unwrap();
        assert_eq!(out, Counter(3));
    }

    /// **Scenario**: Step limit aborts a loop and reports the steps taken.
    #[tokio::test]
    async fn invoke_step_limit_keeps_partial_state() {
        let config = RunnableConfig::default().with_max_steps(4);
        let failure = loop_until(100)
            .invoke(Counter(0), Some(config))
            .await
            .unwrap_err();
        assert!(matches!(failure.error, AgentError::StepLimitExceeded(4)));
        assert_eq!(failure.steps, 4);
        assert_eq!(failure.state, Counter(4));
    }

    /// **Scenario**: Transient failures are retried per policy; the run then succeeds.
    #[tokio::test]
    async fn retry_policy_retries_transient_failures() {
        let mut g = StateGraph::<Counter>::new().with_retry_policy(RetryPolicy::fixed(
            2,
            Duration::from_millis(1),
        ));
        let flaky = Arc::new(FlakyNode {
            failures: 2,
            calls: AtomicUsize::new(0),
        });
        g.add_node("flaky", flaky.clone())
            .set_entry_point("flaky")
            .add_edge("flaky", END);
        let out = g.compile().unwrap().invoke(Counter(0), None).await.unwrap();
        assert_eq!(out, Counter(1));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    /// **Scenario**: Without a retry policy the first transient failure aborts the run.
    #[tokio::test]
    async fn no_retry_by_default() {
        let mut g = StateGraph::<Counter>::new();
        g.add_node(
            "flaky",
            Arc::new(FlakyNode {
                failures: 1,
                calls: AtomicUsize::new(0),
            }),
        )
        .set_entry_point("flaky")
        .add_edge("flaky", END);
        let failure = g
            .compile()
            .unwrap()
            .invoke(Counter(0), None)
            .await
            .unwrap_err();
        assert!(failure.error.is_transient());
        assert_eq!(failure.steps, 0);
    }

    /// **Scenario**: stream with Updates emits one event per step, tagged with the node id.
    #[tokio::test]
    async fn stream_updates_per_step() {
        let events: Vec<_> = loop_until(2)
            .stream(Counter(0), None, HashSet::from([StreamMode::Updates]))
            .collect()
            .await;
        assert_eq!(events.len(), 2);
        for (i, event) in events.iter().enumerate() {
            match event {
                StreamEvent::Updates { node_id, state } => {
                    assert_eq!(node_id, "inc");
                    assert_eq!(state.0, i as i32 + 1);
                }
                other => panic!("expected Updates, got {:?}", other),
            }
        }
    }
}
