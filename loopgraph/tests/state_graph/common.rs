//! Shared state and nodes for the state_graph integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use loopgraph::{AgentError, GraphState, Node, RunContext};

/// Append-only list of labels; each node appends one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    pub steps: Vec<String>,
}

impl Trail {
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(String::as_str).collect()
    }
}

impl GraphState for Trail {
    type Update = Vec<String>;

    fn merge(&mut self, update: Vec<String>) {
        self.steps.extend(update);
    }
}

/// Appends its own id.
pub struct PushNode {
    id: &'static str,
}

impl PushNode {
    pub fn new(id: &'static str) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Node<Trail> for PushNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, _state: &Trail) -> Result<Vec<String>, AgentError> {
        Ok(vec![self.id.to_string()])
    }
}

/// Sleeps before appending its id; counts completed runs.
pub struct SleepNode {
    pub delay: Duration,
    pub completed: AtomicUsize,
}

impl SleepNode {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            completed: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Node<Trail> for SleepNode {
    fn id(&self) -> &str {
        "sleep"
    }

    async fn run(&self, _state: &Trail) -> Result<Vec<String>, AgentError> {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["sleep".to_string()])
    }
}

/// Fails with `error()` every call.
pub struct FailNode {
    pub error: fn() -> AgentError,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Node<Trail> for FailNode {
    fn id(&self) -> &str {
        "fail"
    }

    async fn run(&self, _state: &Trail) -> Result<Vec<String>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.error)())
    }
}

/// Records the step number it sees in its run context.
pub struct StepProbe;

#[async_trait]
impl Node<Trail> for StepProbe {
    fn id(&self) -> &str {
        "probe"
    }

    async fn run(&self, _state: &Trail) -> Result<Vec<String>, AgentError> {
        Ok(vec!["probe".to_string()])
    }

    async fn run_with_context(
        &self,
        _state: &Trail,
        ctx: &RunContext<Trail>,
    ) -> Result<Vec<String>, AgentError> {
        Ok(vec![format!("probe@{}", ctx.step)])
    }
}
