//! LLM client implementations
//!
//! Provides OpenAI and Ollama completion clients with support for both
//! non-streaming and streaming responses over message lists.

use async_trait::async_trait;
use docchat_core::{ChatMessage, DocChatError, LlmClient, LlmConfig, LlmProvider, Result};
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }
    }
}

// ============================================================================
// OpenAI Client
// ============================================================================

/// OpenAI chat-completions API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| DocChatError::ConfigError("OpenAI API key required".to_string()))?;

        let base_url = config
            .openai_base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.clone(),
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: stream.then_some(true),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.request_body(messages, false);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::LlmError(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::LlmError(format!("OpenAI error: {error_text}")));
        }

        let result: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::LlmError(format!("failed to parse response: {e}")))?;

        result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| DocChatError::LlmError("no completion generated".to_string()))
    }

    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let request = self.request_body(messages, true);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::LlmError(format!("stream request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::LlmError(format!(
                "OpenAI stream error: {error_text}"
            )));
        }

        let stream = response.bytes_stream();

        // An SSE event may arrive split across network chunks; carry the
        // trailing partial line in a buffer until its newline shows up.
        let mapped_stream = stream
            .scan(String::new(), |buffer, result| {
                let item = match result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        let content = drain_sse_lines(buffer);
                        if content.is_empty() {
                            None
                        } else {
                            Some(Ok(content))
                        }
                    }
                    Err(e) => Some(Err(DocChatError::LlmError(format!("stream error: {e}")))),
                };
                futures::future::ready(Some(item))
            })
            .filter_map(|item| async move { item });

        Ok(Box::pin(mapped_stream))
    }
}

/// Parse every complete "data: {...}" line out of `buffer`, leaving any
/// trailing partial line in place, and concatenate the delta contents.
fn drain_sse_lines(buffer: &mut String) -> String {
    let mut content = String::new();
    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        let line = line.trim_end();
        if let Some(data) = line.strip_prefix("data: ") {
            if data == "[DONE]" {
                continue;
            }
            if let Ok(parsed) = serde_json::from_str::<StreamResponse>(data) {
                if let Some(choice) = parsed.choices.first() {
                    if let Some(c) = &choice.delta.content {
                        content.push_str(c);
                    }
                }
            }
        }
    }
    content
}

// ============================================================================
// Ollama Client
// ============================================================================

/// Ollama chat API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OllamaResponse {
    message: WireMessage,
    done: bool,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.ollama_url.clone(), config.model.clone())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            stream: Some(false),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::LlmError(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::LlmError(format!("Ollama error: {error_text}")));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| DocChatError::LlmError(format!("failed to parse response: {e}")))?;

        Ok(result.message.content)
    }

    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let request = OllamaRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            stream: Some(true),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DocChatError::LlmError(format!("Ollama stream request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocChatError::LlmError(format!(
                "Ollama stream error: {error_text}"
            )));
        }

        let stream = response.bytes_stream();

        // NDJSON objects may arrive split across network chunks; buffer the
        // trailing partial line until it is complete.
        let mapped_stream = stream
            .scan(String::new(), |buffer, result| {
                let item = match result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        let content = drain_ndjson_lines(buffer);
                        if content.is_empty() {
                            None
                        } else {
                            Some(Ok(content))
                        }
                    }
                    Err(e) => Some(Err(DocChatError::LlmError(format!("stream error: {e}")))),
                };
                futures::future::ready(Some(item))
            })
            .filter_map(|item| async move { item });

        Ok(Box::pin(mapped_stream))
    }
}

/// Parse every complete NDJSON line out of `buffer`, leaving any trailing
/// partial line in place, and concatenate the message contents.
fn drain_ndjson_lines(buffer: &mut String) -> String {
    let mut content = String::new();
    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        if let Ok(parsed) = serde_json::from_str::<OllamaResponse>(line.trim_end()) {
            content.push_str(&parsed.message.content);
        }
    }
    content
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an LLM client from config
pub fn create_llm_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider {
        LlmProvider::OpenAI => Ok(Box::new(OpenAiClient::from_config(config)?)),
        LlmProvider::Ollama => Ok(Box::new(OllamaClient::from_config(config))),
    }
}

// ============================================================================
// Tests
// ============================================================================
