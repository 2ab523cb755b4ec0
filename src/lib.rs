//! Confab - Conversational Agent Core
//!
//! A chat agent that answers free-text questions by alternating model
//! reasoning with tool calls (document retrieval over an indexed corpus,
//! web search), while keeping a durable per-conversation transcript.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat model abstraction with an OpenAI-compatible client
//! - **Tools**: Tool registry with retrieval and web search tools
//! - **Agent**: Orchestration loop, routing, and the conversation store
//! - **Render**: Transcript projection into a safe HTML subset
//! - **CLI**: Command-line interface and chat REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use confab::{Agent, Config};
//! use confab::tools::InMemoryIndex;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut index = InMemoryIndex::new();
//!     index.add_document("faq.txt", "Refunds are issued within 14 days.");
//!
//!     let agent = Agent::new(Config::load(), Arc::new(index)).unwrap();
//!     let answer = agent.submit_turn("conv-1", "What is the refund policy?").await.unwrap();
//!     println!("{}", answer);
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod render;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, ConversationStore};
pub use cli::Repl;
pub use crate::core::{ConfabError, Config, Result};
pub use render::{RenderedMessage, RoleClass};
