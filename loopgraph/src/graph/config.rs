//! Invoke config: step limit, wall-clock timeout, cancellation and run id.
//!
//! Passed to `CompiledStateGraph::invoke` / `stream`. The run loop never relies on the
//! graph terminating by itself: `max_steps` bounds the number of node invocations and
//! `timeout` bounds wall-clock time, since termination depends on an external model.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default maximum number of node invocations per run.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Config for a single run.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(state, config)`; copied into
/// the [`RunContext`](super::RunContext) every node receives.
#[derive(Debug, Clone)]
pub struct RunnableConfig {
    /// Optional id used to correlate log lines of one run.
    pub run_id: Option<String>,
    /// Maximum number of node invocations before the run fails with `StepLimitExceeded`.
    pub max_steps: usize,
    /// Wall-clock budget for the whole run. `None` means no deadline.
    pub timeout: Option<Duration>,
    /// Cancels the run (and the in-flight node) when triggered.
    pub cancellation: CancellationToken,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            run_id: None,
            max_steps: DEFAULT_MAX_STEPS,
            timeout: None,
            cancellation: CancellationToken::new(),
        }
    }
}

impl RunnableConfig {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses an externally owned token (e.g. cancelled on Ctrl-C).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}
