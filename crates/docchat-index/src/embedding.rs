//! Embedding clients for generating vector representations
//!
//! Supports the OpenAI and Ollama embedding APIs. Both implement the
//! [`EmbeddingClient`] trait from docchat-core.

use async_trait::async_trait;
use docchat_core::{DocChatError, EmbeddingClient, LlmConfig, LlmProvider, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// OpenAI Embedding Client
// ============================================================================

/// OpenAI embedding API client
pub struct OpenAiEmbedding {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct OpenAiEmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiEmbedding {
    /// Create a new OpenAI embedding client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        let model = model.into();
        let dimension = match model.as_str() {
            "text-embedding-3-small" => 1536,
            "text-embedding-3-large" => 3072,
            "text-embedding-ada-002" => 1536,
            _ => 1536,
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model,
            dimension,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| DocChatError::ConfigError("OpenAI API key required".to_string()))?;

        let mut client = Self::new(
            api_key.clone(),
            config.embedding_model.clone(),
            config.timeout_secs,
        );

        if let Some(url) = &config.openai_base_url {
            client.base_url = url.clone();
        }

        Ok(client)
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DocChatError::EmbeddingError("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = OpenAiEmbeddingRequest {
            input: texts.to_vec(),
            model: self.model.clone(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::EmbeddingError(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::EmbeddingError(format!(
                "OpenAI embedding error: {error_text}"
            )));
        }

        let result: OpenAiEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::EmbeddingError(format!("failed to parse response: {e}")))?;

        // The API may return items out of order; restore input order
        let mut embeddings: Vec<_> = result.data.into_iter().collect();
        embeddings.sort_by_key(|e| e.index);

        Ok(embeddings.into_iter().map(|e| e.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

// ============================================================================
// Ollama Embedding Client
// ============================================================================

/// Ollama embedding API client
pub struct OllamaEmbedding {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedding {
    /// Create a new Ollama embedding client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimension = match model.as_str() {
            "nomic-embed-text" => 768,
            "mxbai-embed-large" => 1024,
            "all-minilm" => 384,
            _ => 768,
        };

        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model,
            dimension,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.ollama_url.clone(), config.embedding_model.clone())
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = OllamaEmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::EmbeddingError(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::EmbeddingError(format!(
                "Ollama embedding error: {error_text}"
            )));
        }

        let result: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::EmbeddingError(format!("failed to parse response: {e}")))?;

        Ok(result.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Ollama has no native batch endpoint; process sequentially
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an embedding client from config
pub fn create_embedding_client(config: &LlmConfig) -> Result<Box<dyn EmbeddingClient>> {
    match config.provider {
        LlmProvider::OpenAI => Ok(Box::new(OpenAiEmbedding::from_config(config)?)),
        LlmProvider::Ollama => Ok(Box::new(OllamaEmbedding::from_config(config))),
    }
}

// ============================================================================
// Tests
// ============================================================================
