//! Tool node: execute the tool call(s) the last model message requested.
//!
//! `ToolNode` holds a `ToolSource`, implements `Node<AgentState>`; run reads the tool
//! calls of the last message, calls `ToolSource::call_tool(name, args)` and returns one
//! `Tool` message per executed call.
//!
//! # Call policy
//!
//! - `ToolCallPolicy::First` (default): only `tool_calls[0]` is executed, even when the
//!   model requested several.
//! - `ToolCallPolicy::All`: every requested call is executed in order and one `Tool`
//!   message is appended per call before control returns to the agent.
//!
//! # Error Handling
//!
//! By default, tool errors propagate and abort the run. Use `with_handle_tool_errors`
//! to turn them into `Tool` messages the model can react to:
//!
//! - `HandleToolErrors::Never` - Errors propagate (default)
//! - `HandleToolErrors::Always` - Errors become error-text `Tool` messages
//! - `HandleToolErrors::Custom(handler)` - Custom error handler function

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::error::AgentError;
use crate::graph::Node;
use crate::message::{Message, ToolCall};
use crate::state::{AgentState, AgentStateUpdate};
use crate::tool_source::{ToolSource, ToolSourceError};

use super::ACTION_NODE;

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Default error message template for tool errors. `{error}` is substituted.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str = "Error: {error}\n Please fix your mistakes.";

/// Default execution error message template with tool name and kwargs.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// Error handler function type.
///
/// Takes the error, tool name, and tool arguments, returns an error message string.
pub type ErrorHandlerFn =
    Arc<dyn Fn(&ToolSourceError, &str, &Value) -> String + Send + Sync + 'static>;

/// Configuration for how ToolNode handles tool errors.
#[derive(Clone, Default)]
pub enum HandleToolErrors {
    /// Errors propagate and abort the run (default behavior).
    #[default]
    Never,
    /// Errors are caught and returned as a `Tool` message.
    /// `None` uses [`DEFAULT_EXECUTION_ERROR_TEMPLATE`]; a custom template may use the
    /// same `{tool_name}`, `{tool_kwargs}` and `{error}` placeholders.
    Always(Option<String>),
    /// Custom error handler function.
    Custom(ErrorHandlerFn),
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

/// Which of the requested tool calls the node executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolCallPolicy {
    /// Execute only the first requested call.
    #[default]
    First,
    /// Execute every requested call, in order.
    All,
}

/// Tool node: executes requested tool calls and produces `Tool` messages.
///
/// # Example
///
/// ```rust,ignore
/// let action = ToolNode::new(tools)
///     .with_policy(ToolCallPolicy::All)
///     .with_handle_tool_errors(HandleToolErrors::Always(None));
/// ```
///
/// **Interaction**: Implements `Node<AgentState>`; consumes `ToolSource` (e.g.
/// `ToolRegistry`, `MockToolSource`).
pub struct ToolNode {
    tools: Arc<dyn ToolSource>,
    policy: ToolCallPolicy,
    handle_tool_errors: HandleToolErrors,
}

impl ToolNode {
    /// Creates a tool node with the given tool source.
    ///
    /// By default only the first call is serviced and tool errors propagate.
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            policy: ToolCallPolicy::First,
            handle_tool_errors: HandleToolErrors::Never,
        }
    }

    pub fn with_policy(mut self, policy: ToolCallPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the error handling configuration.
    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    /// Returns Some(error_message) if the error should become a `Tool` message,
    /// or None if it should propagate.
    fn handle_error(
        &self,
        error: &ToolSourceError,
        tool_name: &str,
        tool_args: &Value,
    ) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(template) => {
                let template = template
                    .as_deref()
                    .unwrap_or(DEFAULT_EXECUTION_ERROR_TEMPLATE);
                Some(
                    template
                        .replace("{tool_name}", tool_name)
                        .replace("{tool_kwargs}", &tool_args.to_string())
                        .replace("{error}", &error.to_string()),
                )
            }
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, tool_args)),
        }
    }

    /// Executes one call and wraps the outcome into a `Tool` message.
    async fn execute(&self, call: &ToolCall) -> Result<Message, AgentError> {
        debug!(tool = %call.name, args = %call.args, "Calling tool");
        match self.tools.call_tool(&call.name, call.args.clone()).await {
            Ok(content) => {
                trace!(
                    tool = %call.name,
                    result_len = content.text.len(),
                    result_preview = %truncate_for_log(&content.text, 200),
                    "Tool returned"
                );
                Ok(Message::tool(content.text, &call.name, call.id.clone()))
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                match self.handle_error(&e, &call.name, &call.args) {
                    Some(text) => Ok(Message::tool(text, &call.name, call.id.clone())),
                    None => {
                        let err = AgentError::tool(format!("{}: {}", call.name, e));
                        Err(if e.is_transient() { err } else { err.permanent() })
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Node<AgentState> for ToolNode {
    fn id(&self) -> &str {
        ACTION_NODE
    }

    /// Fails with `ContractViolation` when the last message is not a `Model` message
    /// with at least one tool call.
    async fn run(&self, state: &AgentState) -> Result<AgentStateUpdate, AgentError> {
        let calls = state
            .pending_tool_calls()
            .ok_or_else(|| AgentError::ContractViolation {
                node: ACTION_NODE.to_string(),
                message: "last message is not a model message with tool calls".to_string(),
            })?;
        let selected = match self.policy {
            ToolCallPolicy::First => &calls[..1],
            ToolCallPolicy::All => calls,
        };
        info!(
            requested = calls.len(),
            executing = selected.len(),
            "tool node"
        );

        let mut messages = Vec::with_capacity(selected.len());
        for call in selected {
            messages.push(self.execute(call).await?);
        }
        Ok(AgentStateUpdate { messages })
    }
}
