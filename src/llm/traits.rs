//! Chat model trait for abstracting the completion backend
//!
//! Enables swapping the hosted endpoint for a scripted model in tests.

use async_trait::async_trait;

use crate::core::{Message, MessageContent, Result, ToolCall, ToolDefinition};

/// Reply from a chat model invocation
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Body of the reply; may be empty when tool calls are present
    pub content: MessageContent,
    /// Any tool calls the model wants to make
    pub tool_calls: Vec<ToolCall>,
    /// Token usage information
    pub usage: Option<TokenUsage>,
    /// Model that generated the reply
    pub model: String,
}

impl ChatReply {
    /// Create a plain text reply
    pub fn text(content: impl Into<MessageContent>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            usage: None,
            model: model.into(),
        }
    }

    /// Create a reply requesting tool execution
    pub fn tool_calls(tool_calls: Vec<ToolCall>, model: impl Into<String>) -> Self {
        Self {
            content: MessageContent::default(),
            tool_calls,
            usage: None,
            model: model.into(),
        }
    }

    /// Convert into the assistant message appended to the conversation
    pub fn into_message(self) -> Message {
        if self.tool_calls.is_empty() {
            Message::assistant(self.content)
        } else {
            Message::assistant_tool_calls(self.content, self.tool_calls)
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Trait for chat model backends
///
/// One invocation turns the full ordered history plus the declared tool
/// definitions into exactly one assistant reply. Retry policy belongs to
/// the caller, not the implementation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply from the message history with tools available
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ChatReply>;

    /// Get the backend name
    fn name(&self) -> &str;
}
