//! OpenAI-compatible chat completions client
//!
//! Async HTTP client for hosted chat endpoints with tool calling support.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{
    Config, ConfabError, ContentPart, Message, MessageContent, Result, ToolCall, ToolDefinition,
};
use crate::llm::traits::{ChatModel, ChatReply, TokenUsage};

/// Client for an OpenAI-style `/chat/completions` endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    debug: bool,
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

/// Message in the wire format
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call in the wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunction,
}

/// Function in a wire tool call; arguments travel as a JSON string
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    #[serde(default)]
    usage: Option<WireUsage>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

/// Token accounting in the response
#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.model.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.model.base_url.clone(),
            api_key: config.model.api_key.clone(),
            model: config.model.name.clone(),
            debug: config.agent.debug,
        }
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            debug: false,
        }
    }

    /// Convert an internal message to the wire format
    fn to_wire_message(msg: &Message) -> WireMessage {
        WireMessage {
            role: msg.role.to_string(),
            content: Some(Self::to_wire_content(&msg.content)),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| WireToolCall {
                        id: tc.id.clone(),
                        call_type: "function".to_string(),
                        function: WireFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.to_string(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// Serialize a content variant for the wire
    fn to_wire_content(content: &MessageContent) -> serde_json::Value {
        match content {
            MessageContent::Text(text) => serde_json::Value::String(text.clone()),
            MessageContent::Parts(parts) => serde_json::Value::Array(
                parts
                    .iter()
                    .filter_map(|p| p.display_text())
                    .map(|text| serde_json::json!({"type": "text", "text": text}))
                    .collect(),
            ),
        }
    }

    /// Parse a wire content value back into the content variant
    fn from_wire_content(content: Option<serde_json::Value>) -> MessageContent {
        match content {
            None | Some(serde_json::Value::Null) => MessageContent::default(),
            Some(serde_json::Value::String(text)) => MessageContent::Text(text),
            Some(serde_json::Value::Array(entries)) => {
                let parts = entries
                    .into_iter()
                    .map(|entry| {
                        match entry.get("text").and_then(|t| t.as_str()) {
                            Some(text) => ContentPart::Text {
                                text: text.to_string(),
                            },
                            None => ContentPart::Data { value: entry },
                        }
                    })
                    .collect();
                MessageContent::Parts(parts)
            }
            Some(other) => MessageContent::Parts(vec![ContentPart::Data { value: other }]),
        }
    }

    /// Parse the wire tool calls, failing on malformed argument payloads
    fn from_wire_tool_calls(calls: Option<Vec<WireToolCall>>) -> Result<Vec<ToolCall>> {
        calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                let arguments = serde_json::from_str(&tc.function.arguments).map_err(|e| {
                    ConfabError::model(format!(
                        "malformed arguments for tool call '{}': {}",
                        tc.function.name, e
                    ))
                })?;
                Ok(ToolCall::new(tc.id, tc.function.name, arguments))
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ChatReply> {
        let wire_messages: Vec<WireMessage> = messages.iter().map(Self::to_wire_message).collect();

        let request = ChatRequest {
            model: &self.model,
            messages: wire_messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        if self.debug {
            debug!(payload = %serde_json::to_string(&request)?, "chat request");
        }

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                ConfabError::model(format!(
                    "cannot connect to model endpoint at {}",
                    self.base_url
                ))
            } else if e.is_timeout() {
                ConfabError::model(format!("model request timed out: {}", e))
            } else {
                ConfabError::model(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConfabError::model(format!(
                "model endpoint returned {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ConfabError::model(format!("malformed model response: {}", e)))?;

        if self.debug {
            debug!(model = %body.model, choices = body.choices.len(), "chat response");
        }

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ConfabError::model("model response contained no choices"))?;

        Ok(ChatReply {
            content: Self::from_wire_content(choice.message.content),
            tool_calls: Self::from_wire_tool_calls(choice.message.tool_calls)?,
            usage: body.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: body.model,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
