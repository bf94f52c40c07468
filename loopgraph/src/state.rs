//! Agent state: the transcript of one run and its reducer.
//!
//! [`AgentState`] implements [`GraphState`] with concatenation as the reducer: a
//! node's [`AgentStateUpdate`] is appended to the end of `messages`, preserving
//! arrival order. The transcript cannot be edited or truncated through this API.

use serde::Serialize;

use crate::graph::GraphState;
use crate::message::{Message, ToolCall};

/// State of one agent run: the ordered transcript.
///
/// Created fresh per run with [`AgentState::new`] (seeded with a `Human` message) and
/// owned by that run only. The graph runner is the only writer, through
/// [`GraphState::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentState {
    messages: Vec<Message>,
}

impl AgentState {
    /// Fresh state seeded with one `Human` message.
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(user_message)],
        }
    }

    /// State seeded with arbitrary messages (e.g. replaying a transcript in tests).
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Tool calls the last message is waiting on, if any.
    pub fn pending_tool_calls(&self) -> Option<&[ToolCall]> {
        self.last().and_then(Message::pending_tool_calls)
    }

    /// Content of the last `Model` message, i.e. the agent's answer once the run ends.
    pub fn final_answer(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Model { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Consumes the state and returns the transcript.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Partial update produced by one node: messages to append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStateUpdate {
    pub messages: Vec<Message>,
}

impl AgentStateUpdate {
    /// Update carrying exactly one message.
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl GraphState for AgentState {
    type Update = AgentStateUpdate;

    fn merge(&mut self, update: AgentStateUpdate) {
        self.messages.extend(update.messages);
    }
}
