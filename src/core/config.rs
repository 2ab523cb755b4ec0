//! Configuration management for Confab
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/confab/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::core::error::{ConfabError, Result};

/// Main configuration for Confab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat model endpoint configuration
    pub model: ModelConfig,
    /// Web search configuration
    pub search: SearchConfig,
    /// Document retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Agent loop configuration
    pub agent: AgentConfig,
}

/// Chat model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// API key; defaults to the OPENAI_API_KEY environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Web search endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search API
    pub base_url: String,
    /// API key; defaults to the TAVILY_API_KEY environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maximum number of results returned per query
    pub max_results: usize,
}

/// Document retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory of plain-text corpus files loaded by the binary
    pub corpus_dir: PathBuf,
    /// Number of snippets returned per query
    pub top_k: usize,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model/tool rounds before the loop forces an answer
    /// Default: 10
    pub max_rounds: usize,
    /// Whether to log request and response payloads at debug level
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            search: SearchConfig::default(),
            retrieval: RetrievalConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("CONFAB_MODEL_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("OPENAI_API_KEY").ok(),
            name: env::var("CONFAB_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("CONFAB_SEARCH_URL")
                .unwrap_or_else(|_| "https://api.tavily.com".to_string()),
            api_key: env::var("TAVILY_API_KEY").ok(),
            max_results: 2,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            corpus_dir: env::var("CONFAB_CORPUS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("corpus")),
            top_k: 4,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            debug: env::var("CONFAB_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("confab")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Pick up a .env file if one exists
        let _ = dotenvy::dotenv();

        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ConfabError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ConfabError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfabError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ConfabError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfabError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ConfabError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Save configuration and return the path
    pub fn save_and_get_path(&self) -> Result<PathBuf> {
        self.save()?;
        Ok(Self::config_file())
    }

    /// Validate endpoint URLs
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.model.base_url)
            .map_err(|e| ConfabError::config(format!("Invalid model base URL: {}", e)))?;
        Url::parse(&self.search.base_url)
            .map_err(|e| ConfabError::config(format!("Invalid search base URL: {}", e)))?;

        if self.agent.max_rounds == 0 {
            return Err(ConfabError::config("max_rounds must be at least 1"));
        }

        Ok(())
    }
}
