//! Custom error types for Confab
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Confab operations
#[derive(Error, Debug)]
pub enum ConfabError {
    /// The external model call failed; fatal to the current turn
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// A single tool invocation failed; recovered inside the turn
    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Confab operations
pub type Result<T> = std::result::Result<T, ConfabError>;

impl ConfabError {
    /// Create a model invocation error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelInvocation(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
