//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Talks to any OpenAI-compatible endpoint (OpenAI, Groq, local gateways) through
//! `async_openai`. Tools passed to `invoke` are sent as function tools; when the model
//! requests them the response carries `tool_calls`.
//!
//! **Interaction**: Implements `LlmClient`; used by `AgentNode` like `MockLlm`.
//! Depends on `async_openai` (feature `openai`).

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
        ToolChoiceOptions,
    },
    Client,
};

use super::ToolChoiceMode;

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config via
/// `ChatOpenAI::with_config` (custom key or base URL, e.g. Groq's
/// `https://api.groq.com/openai/v1`).
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    tool_choice: Option<ToolChoiceMode>,
    system_prompt: Option<String>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::new(), model)
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self::with_client(Client::with_config(config), model)
    }

    fn with_client(client: Client<OpenAIConfig>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            tool_choice: None,
            system_prompt: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap on generated tokens per completion.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set tool choice mode (auto, none, required). Overrides API default when tools are present.
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    /// System message sent before the transcript on every call. Not stored in the transcript.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Convert the transcript (plus optional system prompt) to OpenAI request messages.
    fn messages_to_request(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        let mut out = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            out.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(prompt.as_str()),
            ));
        }
        for (i, m) in messages.iter().enumerate() {
            let msg = match m {
                Message::Human { content } => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(content.as_str()),
                ),
                Message::Model {
                    content,
                    tool_calls,
                } => {
                    // Calls without a Tool reply are left out; the API rejects unanswered ids.
                    let answered = answered_call_ids(&messages[i + 1..]);
                    let calls: Vec<ChatCompletionMessageToolCalls> = tool_calls
                        .iter()
                        .map(|tc| (request_call_id(tc), tc))
                        .filter(|(id, _)| answered.contains(id))
                        .map(|(id, tc)| {
                            ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
                                id,
                                function: FunctionCall {
                                    name: tc.name.clone(),
                                    arguments: tc.args.to_string(),
                                },
                            })
                        })
                        .collect();
                    if calls.is_empty() {
                        ChatCompletionRequestMessage::Assistant(content.as_str().into())
                    } else {
                        let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                        if !content.is_empty() {
                            args.content(content.as_str());
                        }
                        let assistant = args.tool_calls(calls).build().map_err(|e| {
                            AgentError::reasoning(format!("OpenAI request build failed: {}", e))
                                .permanent()
                        })?;
                        ChatCompletionRequestMessage::Assistant(assistant)
                    }
                }
                Message::Tool {
                    content,
                    name,
                    call_id,
                } => {
                    let tool = ChatCompletionRequestToolMessageArgs::default()
                        .content(content.as_str())
                        .tool_call_id(call_id.clone().unwrap_or_else(|| name.clone()))
                        .build()
                        .map_err(|e| {
                            AgentError::reasoning(format!("OpenAI request build failed: {}", e))
                                .permanent()
                        })?;
                    ChatCompletionRequestMessage::Tool(tool)
                }
            };
            out.push(msg);
        }
        Ok(out)
    }
}

/// Id a tool call is sent under; a `Tool` reply without `call_id` uses the tool name.
fn request_call_id(call: &ToolCall) -> String {
    call.id.clone().unwrap_or_else(|| call.name.clone())
}

/// Ids answered by the `Tool` messages directly following a model message.
fn answered_call_ids(rest: &[Message]) -> HashSet<String> {
    rest.iter()
        .map_while(|m| match m {
            Message::Tool { name, call_id, .. } => {
                Some(call_id.clone().unwrap_or_else(|| name.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Parses the JSON-encoded arguments of a returned tool call. Empty means `{}`.
fn parse_arguments(name: &str, arguments: &str) -> Result<Value, AgentError> {
    if arguments.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(arguments).map_err(|e| {
        AgentError::reasoning(format!(
            "malformed arguments for tool call {}: {}",
            name, e
        ))
        .permanent()
    })
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let openai_messages = self.messages_to_request(messages)?;
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(openai_messages);

        if !tools.is_empty() {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);

            if let Some(mode) = self.tool_choice {
                let opt = match mode {
                    ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                    ToolChoiceMode::None => ToolChoiceOptions::None,
                    ToolChoiceMode::Required => ToolChoiceOptions::Required,
                };
                args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
            }
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        if let Some(n) = self.max_tokens {
            args.max_completion_tokens(n);
        }

        let request = args
            .build()
            .map_err(|e| {
                AgentError::reasoning(format!("OpenAI request build failed: {}", e)).permanent()
            })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::reasoning(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::reasoning("OpenAI returned no choices"))?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let mut tool_calls = Vec::new();
        for tc in msg.tool_calls.unwrap_or_default() {
            if let ChatCompletionMessageToolCalls::Function(f) = tc {
                let args = parse_arguments(&f.function.name, &f.function.arguments)?;
                tool_calls.push(ToolCall::new(f.function.name, args).with_id(f.id));
            }
        }
        tracing::debug!(
            model = %self.model,
            tool_calls = tool_calls.len(),
            content_len = content.len(),
            "Chat completion received"
        );

        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }
}
