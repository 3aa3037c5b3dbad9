//! docchat Core - Shared types, traits, and configuration
//!
//! This crate defines the abstractions used throughout the docchat system:
//! - Common error types
//! - Chat message types for completion requests
//! - Traits for the completion and embedding collaborators
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, LlmConfig, LlmProvider, RagConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for docchat operations
#[derive(Error, Debug)]
pub enum DocChatError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("PDF extraction error: {0}")]
    PdfError(String),

    #[error("Article error: {0}")]
    ArticleError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DocChatError>;

// ============================================================================
// Chat Messages
// ============================================================================

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for completion service clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Issue a single non-streaming completion for a message list
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Open a streaming completion; yields token fragments as they arrive
    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<futures::stream::BoxStream<'static, Result<String>>>;
}

/// Trait for embedding service clients
#[async_trait::async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_builders() {
        let msg = ChatMessage::system("be helpful");
        assert_eq!(msg.role, ChatRole::System);
        assert_eq!(msg.content, "be helpful");

        let msg = ChatMessage::user("hello");
        assert_eq!(msg.role, ChatRole::User);
    }

    #[test]
    fn test_chat_role_serialization() {
        let json = serde_json::to_string(&ChatRole::System).unwrap();
        assert_eq!(json, "\"system\"");
        assert_eq!(ChatRole::User.to_string(), "user");
    }

    #[test]
    fn test_error_display() {
        let err = DocChatError::ValidationError("no valid URL found in input".to_string());
        assert!(err.to_string().contains("no valid URL"));
    }
}
