//! Tool source abstraction: list tools and call a tool by name.
//!
//! The tool node depends on a [`ToolSource`] to execute the calls the model requested;
//! the agent node passes [`ToolSpec`]s from `list_tools` to the model so it knows what
//! it may call.

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Tool specification: name, description and JSON schema of the arguments.
///
/// Field layout follows the OpenAI function-tool shape so it maps directly onto
/// chat-completion tool definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema of the arguments object.
    pub input_schema: Value,
}

/// Text result of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Error from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// No tool registered under the requested name.
    #[error("tool not found: {0}")]
    NotFound(String),
    /// Arguments do not match the tool's schema.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The remote service could not be reached or returned an error status.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ToolSourceError {
    /// Only transport failures may succeed on a repeated call.
    pub fn is_transient(&self) -> bool {
        matches!(self, ToolSourceError::Transport(_))
    }
}

/// Tool source: list available tools and execute one call.
///
/// **Interaction**: Used by `ToolNode` (call_tool) and `AgentRunner` (list_tools, to
/// advertise tools to the model). Implementations: `ToolRegistry`, `MockToolSource`.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Calls tool `name` with JSON `arguments`; the result is coerced to text.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
