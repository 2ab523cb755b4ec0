//! Web search tool
//!
//! HTTP client for a Tavily-style search API returning titled snippets.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, ConfabError, Result};

/// Client for the web search endpoint
#[derive(Clone)]
pub struct WebSearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

/// Search request payload
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
    query: &'a str,
    max_results: usize,
}

/// Search response payload
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// One search result
#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl WebSearchClient {
    /// Create a new client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.search.base_url.clone(),
            api_key: config.search.api_key.clone(),
            max_results: config.search.max_results,
        }
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, max_results: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
            max_results,
        }
    }

    /// Run a search query and format the results as result text
    pub async fn invoke(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(ConfabError::tool("search query is empty"));
        }

        let request = SearchRequest {
            api_key: self.api_key.as_deref(),
            query,
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ConfabError::tool(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ConfabError::tool(format!(
                "search endpoint returned {}",
                status
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ConfabError::tool(format!("malformed search response: {}", e)))?;

        debug!(query, results = body.results.len(), "web search");

        if body.results.is_empty() {
            return Ok("No search results found.".to_string());
        }

        let formatted: Vec<String> = body
            .results
            .iter()
            .take(self.max_results)
            .map(|r| format!("{} ({})\n{}", r.title, r.url, r.content))
            .collect();

        Ok(formatted.join("\n\n"))
    }
}
