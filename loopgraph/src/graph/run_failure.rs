//! Failed run: the error plus the state accumulated before it.

use std::fmt::Debug;

use thiserror::Error;

use crate::error::AgentError;

/// Error returned by `CompiledStateGraph::invoke` when a run aborts.
///
/// `state` is the partial state as of the failure (for `AgentState`, the transcript
/// accumulated so far), kept for diagnostics. `steps` is the number of node
/// invocations whose updates were merged into `state`.
#[derive(Debug, Error)]
#[error("{error} (after {steps} steps)")]
pub struct RunFailure<S: Debug> {
    #[source]
    pub error: AgentError,
    pub state: S,
    pub steps: usize,
}

impl<S: Debug> RunFailure<S> {
    /// Drops the partial state and returns the underlying error.
    pub fn into_error(self) -> AgentError {
        self.error
    }
}
