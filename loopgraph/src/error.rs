//! Run-time error types.
//!
//! `AgentError` is returned by nodes and by the graph run loop. Compile-time wiring
//! errors live in [`CompilationError`](crate::graph::CompilationError); a failed run
//! wraps its `AgentError` together with the partial state in
//! [`RunFailure`](crate::graph::RunFailure).

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// External collaborator whose call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The language model that decides whether to answer or call a tool.
    Reasoning,
    /// The tool service (e.g. web search).
    Tool,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Reasoning => write!(f, "reasoning"),
            Service::Tool => write!(f, "tool"),
        }
    }
}

/// Error raised while executing a graph run.
///
/// Every variant is fatal for the run; only a `ServiceFailure` marked `transient` may be
/// retried by a [`RetryPolicy`](crate::graph::RetryPolicy).
#[derive(Debug, Error)]
pub enum AgentError {
    /// The reasoning or tool service call failed (network, rate limit, malformed response).
    ///
    /// `transient` is false when repeating the same call cannot succeed (unknown tool,
    /// invalid arguments, a request that cannot be built).
    #[error("{service} service failed: {message}")]
    ServiceFailure {
        service: Service,
        message: String,
        transient: bool,
    },

    /// A router produced a label with no matching branch.
    #[error("routing failed after node {node}: label {label} has no branch")]
    Routing { node: String, label: String },

    /// A node was invoked while its precondition did not hold (wiring bug).
    #[error("contract violation in node {node}: {message}")]
    ContractViolation { node: String, message: String },

    /// The run reached the maximum number of node invocations without terminating.
    #[error("step limit of {0} exceeded before reaching END")]
    StepLimitExceeded(usize),

    /// The run did not finish within its wall-clock timeout.
    #[error("run deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The run was cancelled through its cancellation token.
    #[error("run cancelled")]
    Cancelled,
}

impl AgentError {
    /// Transient reasoning service failure with the given message.
    pub fn reasoning(message: impl Into<String>) -> Self {
        Self::ServiceFailure {
            service: Service::Reasoning,
            message: message.into(),
            transient: true,
        }
    }

    /// Transient tool service failure with the given message.
    pub fn tool(message: impl Into<String>) -> Self {
        Self::ServiceFailure {
            service: Service::Tool,
            message: message.into(),
            transient: true,
        }
    }

    /// Marks a `ServiceFailure` as not worth retrying. Other variants are unchanged.
    pub fn permanent(self) -> Self {
        match self {
            Self::ServiceFailure {
                service, message, ..
            } => Self::ServiceFailure {
                service,
                message,
                transient: false,
            },
            other => other,
        }
    }

    /// Whether a retry may succeed. Only transient service failures qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceFailure { transient: true, .. })
    }
}
