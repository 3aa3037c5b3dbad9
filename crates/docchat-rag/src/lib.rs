//! docchat RAG - Retrieval-augmented answering and session state
//!
//! Implements the query flow shared by the PDF and article endpoints:
//! retrieve the top-k chunks most similar to the question, assemble a
//! grounding prompt, and ask the completion service. Also owns the
//! single-slot session state and the article flow's two-state
//! (`Empty` -> `Loaded`) transition logic.

use docchat_core::{EmbeddingClient, LlmClient, Result};
use docchat_index::VectorIndex;
use docchat_ingest::extract_url;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod llm;
pub mod prompt;

pub use llm::{create_llm_client, OllamaClient, OpenAiClient};
pub use prompt::{CHAT_SYSTEM_INSTRUCTION, DEFAULT_ARTICLE_QUESTION};

// ============================================================================
// Session State
// ============================================================================

/// A single-slot holder for the most recently built index.
///
/// Starts empty; populated only by its load endpoint. Replacement is an
/// atomic swap of the `Arc`, and readers take a snapshot clone, so a query
/// observes either the complete old index or the complete new one. Between
/// concurrent loads, the last write to complete wins.
pub struct SessionSlot {
    index: RwLock<Option<Arc<VectorIndex>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(None),
        }
    }

    /// Replace the slot contents wholesale, discarding any previous index.
    pub async fn replace(&self, index: VectorIndex) {
        *self.index.write().await = Some(Arc::new(index));
    }

    /// Snapshot the current index, if any.
    pub async fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.index.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.index.read().await.is_some()
    }
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Article Query Planning
// ============================================================================

/// Decision for an `ask_article` request, separated from the I/O that
/// carries it out so the fallback is testable without a live fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleQueryPlan<'a> {
    /// An article is loaded; answer the question against the existing index
    UseExisting,
    /// No article loaded but the question is URL-like: load it, then answer
    /// the fixed default question
    AutoLoad { url: &'a str },
    /// No article loaded and nothing to load from
    Reject,
}

/// Pure transition function for the article session's two-state machine.
pub fn plan_article_query(loaded: bool, question: &str) -> ArticleQueryPlan<'_> {
    if loaded {
        return ArticleQueryPlan::UseExisting;
    }

    match extract_url(question) {
        Some(url) => ArticleQueryPlan::AutoLoad { url },
        None => ArticleQueryPlan::Reject,
    }
}

// ============================================================================
// RAG Engine
// ============================================================================

/// Retrieval-augmented answer engine shared by both Q&A flows.
pub struct RagEngine {
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingClient>,
    top_k: usize,
}

impl RagEngine {
    pub fn new(llm: Arc<dyn LlmClient>, embedder: Arc<dyn EmbeddingClient>, top_k: usize) -> Self {
        Self {
            llm,
            embedder,
            top_k,
        }
    }

    pub fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingClient> {
        &self.embedder
    }

    /// Answer a question about the uploaded PDF.
    pub async fn answer_pdf(&self, index: &VectorIndex, query: &str) -> Result<String> {
        let context = self.retrieve_context(index, query).await?;
        let grounding = prompt::pdf_prompt(&context, query);
        self.complete_grounded(&grounding).await
    }

    /// Answer a question about the loaded article.
    pub async fn answer_article(&self, index: &VectorIndex, question: &str) -> Result<String> {
        let context = self.retrieve_context(index, question).await?;
        let grounding = prompt::article_prompt(&context, question);
        self.complete_grounded(&grounding).await
    }

    /// Retrieve the top-k chunks for `query` and join them into a context block.
    async fn retrieve_context(&self, index: &VectorIndex, query: &str) -> Result<String> {
        let chunks = index
            .retrieve(query, self.top_k, self.embedder.as_ref())
            .await?;
        tracing::debug!("retrieved {} chunks for grounding", chunks.len());
        Ok(prompt::join_context(&chunks))
    }

    /// Single non-streaming completion over a one-message conversation.
    async fn complete_grounded(&self, grounding: &str) -> Result<String> {
        let messages = vec![docchat_core::ChatMessage::user(grounding)];
        self.llm.complete(&messages).await
    }
}

// ============================================================================
// Tests
// ============================================================================
