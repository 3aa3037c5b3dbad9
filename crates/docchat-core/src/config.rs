//! docchat configuration management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// RAG pipeline configuration
    pub rag: RagConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(origin) = std::env::var("CORS_ORIGIN") {
            config.server.cors_origin = origin;
        }

        // LLM
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider.parse()?;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.openai_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.llm.openai_base_url = Some(url);
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.llm.ollama_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true");
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Timeout for outbound article downloads in seconds
    pub fetch_timeout_secs: u64,

    /// Maximum request body size in bytes (bounds PDF uploads)
    pub max_body_size: usize,

    /// The single allowed CORS origin
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            fetch_timeout_secs: 30,
            max_body_size: 25 * 1024 * 1024, // 25MB
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM provider to use
    pub provider: LlmProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for Azure or compatible APIs)
    pub openai_base_url: Option<String>,

    /// Ollama server URL
    pub ollama_url: String,

    /// Model name to use for completions
    pub model: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Maximum tokens for completion
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            openai_api_key: None,
            openai_base_url: None,
            ollama_url: "http://localhost:11434".to_string(),
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::InvalidValue {
                key: "LLM_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// RAG pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Number of chunks to retrieve per query
    pub top_k: usize,

    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Overlap between neighboring chunks in characters
    pub chunk_overlap: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
