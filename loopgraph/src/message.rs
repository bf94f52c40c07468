//! Transcript messages.
//!
//! A run's transcript is an ordered, append-only sequence of [`Message`] values.
//! Messages are plain values; once pushed into [`AgentState`](crate::AgentState)
//! they are never mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured request from the reasoning component to invoke one tool.
///
/// `args` is a JSON object mapping argument names to values. `id` is set when the
/// model provider assigns call ids (OpenAI-compatible APIs do); it is echoed back on
/// the matching [`Message::Tool`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn empty_args() -> Value {
    Value::Object(Default::default())
}

impl ToolCall {
    /// Tool call without a provider id.
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            args,
        }
    }

    /// Sets the provider-assigned call id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// User-originated text.
    Human { content: String },
    /// Output of the reasoning component; `tool_calls` may be empty.
    Model {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },
    /// Result of executing one tool call, coerced to text.
    Tool {
        content: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
    },
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Model message that requests no tools (a final answer).
    pub fn model(content: impl Into<String>) -> Self {
        Self::Model {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn model_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Model {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(content: impl Into<String>, name: impl Into<String>, call_id: Option<String>) -> Self {
        Self::Tool {
            content: content.into(),
            name: name.into(),
            call_id,
        }
    }

    /// Text content of any variant.
    pub fn content(&self) -> &str {
        match self {
            Self::Human { content } | Self::Model { content, .. } | Self::Tool { content, .. } => {
                content
            }
        }
    }

    /// Tool calls requested by a `Model` message that carries at least one.
    ///
    /// Returns `None` for other variants and for a `Model` message with an empty list,
    /// which is exactly the case where the loop should stop.
    pub fn pending_tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Self::Model { tool_calls, .. } if !tool_calls.is_empty() => Some(tool_calls),
            _ => None,
        }
    }

    /// Short role label used in logs and CLI output.
    pub fn role(&self) -> &'static str {
        match self {
            Self::Human { .. } => "human",
            Self::Model { .. } => "model",
            Self::Tool { .. } => "tool",
        }
    }
}
