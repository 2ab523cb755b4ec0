//! Shared types used across Confab modules
//!
//! Contains the message model, tool call structures, and tool definitions.

use serde::{Deserialize, Serialize};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human talking to the agent
    User,
    /// The model
    Assistant,
    /// A tool result fed back to the model
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// One part of a structured message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text { text: String },
    /// Output captured from a tool invocation
    ToolOutput { output: String },
    /// Opaque structured payload with no displayable text
    Data { value: serde_json::Value },
}

impl ContentPart {
    /// Displayable text for this part, if it carries any
    pub fn display_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::ToolOutput { output } => Some(output),
            ContentPart::Data { .. } => None,
        }
    }
}

/// Message body: either a plain string or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Structured content parts
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten the content into a single displayable string.
    ///
    /// Strings pass through unchanged. For structured content the
    /// text-bearing parts are concatenated in order; parts without
    /// displayable text are skipped.
    pub fn display_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::display_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whether the content flattens to an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(text) => text.is_empty(),
            MessageContent::Parts(parts) => parts
                .iter()
                .all(|p| p.display_text().map_or(true, str::is_empty)),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

/// A message in a conversation
///
/// Messages are immutable once appended to a conversation log; append
/// order is the entire context given to the next model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message
    pub role: Role,
    /// Message body
    pub content: MessageContent,
    /// Tool calls requested by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For tool messages, the id of the call that produced this result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a plain assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message requesting tool execution
    pub fn assistant_tool_calls(
        content: impl Into<MessageContent>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Create a tool-result message linked to the originating call
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Flattened display text of the message body
    pub fn display_text(&self) -> String {
        self.content.display_text()
    }

    /// Tool calls carried by this message, empty if none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier the tool result must reference
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a string argument by key
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// The query argument every registered tool accepts
    pub fn query(&self) -> String {
        self.get_string("query").unwrap_or_default()
    }
}

/// Definition of a tool that can be called by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description the model uses to decide applicability
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// Name of the underlying function
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Result of executing a single tool call
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Id of the call that produced this result
    pub tool_call_id: String,
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output from the tool, or an error description on failure
    pub output: String,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            output: output.into(),
        }
    }

    /// Create a failed result
    ///
    /// Failures stay inside the turn: the error text becomes a visible
    /// tool message so the model can decide how to proceed.
    pub fn failure(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            output: format!("tool error: {}", error.into()),
        }
    }

    /// Convert into the tool message appended to the conversation
    pub fn into_message(self) -> Message {
        Message::tool(self.tool_call_id, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_text_plain() {
        let msg = Message::assistant("hello");
        assert_eq!(msg.display_text(), "hello");
    }

    #[test]
    fn test_display_text_parts_skips_data() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "first".to_string(),
            },
            ContentPart::Data {
                value: json!({"trace": 1}),
            },
            ContentPart::ToolOutput {
                output: "second".to_string(),
            },
        ]);
        assert_eq!(content.display_text(), "first\nsecond");
        assert!(!content.is_empty());
    }

    #[test]
    fn test_empty_parts_content() {
        let content = MessageContent::Parts(vec![ContentPart::Data { value: json!([]) }]);
        assert_eq!(content.display_text(), "");
        assert!(content.is_empty());
    }

    #[test]
    fn test_tool_call_query() {
        let call = ToolCall::new("t1", "web_search", json!({"query": "refund policy"}));
        assert_eq!(call.query(), "refund policy");

        let missing = ToolCall::new("t2", "web_search", json!({}));
        assert_eq!(missing.query(), "");
    }

    #[test]
    fn test_tool_result_failure_message() {
        let msg = ToolResult::failure("t1", "retrieve_documents", "index offline").into_message();
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("t1"));
        assert!(msg.display_text().contains("index offline"));
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message::assistant_tool_calls(
            "",
            vec![ToolCall::new("t1", "web_search", json!({"query": "news"}))],
        );
        let encoded = serde_json::to_string(&msg).unwrap();
        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, msg);
    }
}
