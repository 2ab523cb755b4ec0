//! LLM module - chat model integrations
//!
//! Provides the chat model abstraction with an OpenAI-compatible client.

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{ChatModel, ChatReply, TokenUsage};
