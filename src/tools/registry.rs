//! Tool registry - manages and dispatches tool calls
//!
//! Central hub exposing the fixed set of tools the model may call and
//! routing requested calls to their executors.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::core::{ConfabError, ToolCall, ToolDefinition, ToolResult};
use crate::tools::retrieval::{DocumentIndex, RetrievalTool};
use crate::tools::search::WebSearchClient;

/// Name of the corpus retrieval tool
pub const RETRIEVAL_TOOL: &str = "retrieve_documents";
/// Name of the web search tool
pub const SEARCH_TOOL: &str = "web_search";

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool definitions indexed by name
    definitions: HashMap<String, ToolDefinition>,
    /// Corpus retrieval executor
    retrieval: RetrievalTool,
    /// Web search executor, absent when no endpoint is configured
    search: Option<WebSearchClient>,
}

impl ToolRegistry {
    /// Create a registry with the retrieval tool only
    pub fn new(index: Arc<dyn DocumentIndex>, top_k: usize) -> Self {
        let mut registry = Self {
            definitions: HashMap::new(),
            retrieval: RetrievalTool::new(index, top_k),
            search: None,
        };

        registry.register(ToolDefinition::function(
            RETRIEVAL_TOOL,
            "Search the indexed document corpus and return matching passages",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        ));

        registry
    }

    /// Create a registry with retrieval and web search enabled
    pub fn with_search(
        index: Arc<dyn DocumentIndex>,
        top_k: usize,
        search: WebSearchClient,
    ) -> Self {
        let mut registry = Self::new(index, top_k);
        registry.search = Some(search);

        registry.register(ToolDefinition::function(
            SEARCH_TOOL,
            "Search the web for current information and return titled snippets",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        ));

        registry
    }

    /// Register a tool definition
    fn register(&mut self, definition: ToolDefinition) {
        self.definitions
            .insert(definition.name().to_string(), definition);
    }

    /// Get all tool definitions, in a stable order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.definitions.values().cloned().collect();
        defs.sort_by(|a, b| a.name().cmp(b.name()));
        defs
    }

    /// Check whether a tool name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Execute a single tool call.
    ///
    /// Never fails the turn: execution errors and unknown tool names are
    /// folded into a failed `ToolResult` whose text the model sees on the
    /// next step.
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        let query = tool_call.query();

        let outcome = match tool_call.name.as_str() {
            RETRIEVAL_TOOL => self.retrieval.invoke(&query).await,
            SEARCH_TOOL => match &self.search {
                Some(search) => search.invoke(&query).await,
                None => Err(ConfabError::tool("web search is not enabled")),
            },
            other => Err(ConfabError::tool(format!("unknown tool: {}", other))),
        };

        match outcome {
            Ok(output) => ToolResult::success(&tool_call.id, &tool_call.name, output),
            Err(e) => {
                warn!(tool = %tool_call.name, error = %e, "tool invocation failed");
                ToolResult::failure(&tool_call.id, &tool_call.name, e.to_string())
            }
        }
    }
}
