//! Agent node: send the transcript to the reasoning service, append its reply.
//!
//! `AgentNode` holds an LLM client and the tool specs advertised to it, implements
//! `Node<AgentState>`; run passes the full transcript to the model and returns one
//! `Model` message (with zero or more tool calls) as the update.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::state::{AgentState, AgentStateUpdate};
use crate::tool_source::ToolSpec;

use super::AGENT_NODE;

/// Agent node: one reasoning step that produces exactly one `Model` message.
///
/// Whether the loop continues is decided afterwards by
/// [`should_continue`](super::should_continue) from the message's tool calls.
///
/// **Interaction**: Implements `Node<AgentState>`; consumes `LlmClient` (e.g. `MockLlm`,
/// `ChatOpenAI`). A failed model call surfaces as a reasoning `ServiceFailure`.
pub struct AgentNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl AgentNode {
    /// Creates an agent node that advertises `tools` to `llm` on every call.
    pub fn new(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>) -> Self {
        Self { llm, tools }
    }
}

#[async_trait]
impl Node<AgentState> for AgentNode {
    fn id(&self) -> &str {
        AGENT_NODE
    }

    async fn run(&self, state: &AgentState) -> Result<AgentStateUpdate, AgentError> {
        tracing::info!(messages = state.len(), "agent node");
        let response = self.llm.invoke(state.messages(), &self.tools).await?;
        tracing::debug!(
            tool_calls = response.tool_calls.len(),
            content_len = response.content.len(),
            "model replied"
        );
        Ok(AgentStateUpdate::message(response.into_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::llm::{LlmResponse, MockLlm};
    use crate::message::{Message, ToolCall};

    /// **Scenario**: The update is exactly one Model message built from the response.
    #[tokio::test]
    async fn agent_node_appends_one_model_message() {
        let call = ToolCall::new("search", json!({"query": "paris"}));
        let llm = Arc::new(MockLlm::new(LlmResponse::with_tool_calls(
            "",
            vec![call.clone()],
        )));
        let node = AgentNode::new(llm.clone(), vec![]);
        let update = node.run(&AgentState::new("weather?")).await.unwrap();
        assert_eq!(
            update.messages,
            vec![Message::model_with_tool_calls("", vec![call])]
        );
        assert_eq!(llm.seen_lengths(), vec![1]);
    }

    /// **Scenario**: A failing model surfaces as a transient ServiceFailure.
    #[tokio::test]
    async fn agent_node_propagates_service_failure() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("x").with_failures(1));
        let node = AgentNode::new(llm, vec![]);
        let err = node.run(&AgentState::new("q")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(node.id(), "agent");
    }
}
