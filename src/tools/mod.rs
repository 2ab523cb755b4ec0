//! Tools module - tool implementations for the agent
//!
//! Contains document retrieval, web search, and the tool registry.

pub mod registry;
pub mod retrieval;
pub mod search;

pub use registry::{ToolRegistry, RETRIEVAL_TOOL, SEARCH_TOOL};
pub use retrieval::{DocumentIndex, InMemoryIndex, RetrievalTool, Snippet};
pub use search::WebSearchClient;
