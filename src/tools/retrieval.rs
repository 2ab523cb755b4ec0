//! Document retrieval over an indexed corpus
//!
//! The index build itself is an external concern; this module defines the
//! search capability the agent consumes plus a keyword-scored in-memory
//! index used by the binary and the tests.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

use crate::core::{ConfabError, Result};

/// A scored passage returned from an index search
#[derive(Debug, Clone)]
pub struct Snippet {
    /// Identifier of the source document
    pub source: String,
    /// Passage text
    pub text: String,
    /// Relevance score, higher is better
    pub score: f64,
}

/// Search capability over an indexed document corpus
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Return the best-matching passages for a query
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>>;
}

/// One document held by the in-memory index
#[derive(Debug, Clone)]
struct IndexedDocument {
    source: String,
    text: String,
    tokens: HashSet<String>,
}

/// Keyword-scored in-memory document index
///
/// Scores query/document overlap with token-set Jaccard similarity.
/// Good enough for modest corpora; the `DocumentIndex` trait is the seam
/// for an embedding-backed implementation.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    documents: Vec<IndexedDocument>,
}

impl InMemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to the index
    pub fn add_document(&mut self, source: impl Into<String>, text: impl Into<String>) {
        let text = text.into();
        self.documents.push(IndexedDocument {
            source: source.into(),
            tokens: Self::tokenize(&text),
            text,
        });
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Lowercased alphanumeric tokens of at least two characters
    fn tokenize(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 2)
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// Token-set Jaccard similarity between a query and a document
    fn similarity(query_tokens: &HashSet<String>, doc_tokens: &HashSet<String>) -> f64 {
        if query_tokens.is_empty() || doc_tokens.is_empty() {
            return 0.0;
        }
        let intersection = query_tokens.intersection(doc_tokens).count() as f64;
        let union = query_tokens.union(doc_tokens).count() as f64;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

#[async_trait]
impl DocumentIndex for InMemoryIndex {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>> {
        let query_tokens = Self::tokenize(query);

        let mut scored: Vec<Snippet> = self
            .documents
            .iter()
            .map(|doc| Snippet {
                source: doc.source.clone(),
                text: doc.text.clone(),
                score: Self::similarity(&query_tokens, &doc.tokens),
            })
            .filter(|s| s.score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        debug!(query, hits = scored.len(), "index search");
        Ok(scored)
    }
}

/// The retrieval tool exposed to the model
pub struct RetrievalTool {
    index: std::sync::Arc<dyn DocumentIndex>,
    top_k: usize,
}

impl RetrievalTool {
    /// Create a retrieval tool over the given index
    pub fn new(index: std::sync::Arc<dyn DocumentIndex>, top_k: usize) -> Self {
        Self { index, top_k }
    }

    /// Run a query and format the hits as result text
    pub async fn invoke(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(ConfabError::tool("retrieval query is empty"));
        }

        let snippets = self.index.search(query, self.top_k).await?;

        if snippets.is_empty() {
            return Ok("No matching passages found.".to_string());
        }

        let formatted: Vec<String> = snippets
            .iter()
            .map(|s| format!("[{}]\n{}", s.source, s.text))
            .collect();

        Ok(formatted.join("\n\n"))
    }
}
