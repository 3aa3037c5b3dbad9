//! Application state management

use docchat_core::config::AppConfig;
use docchat_core::{EmbeddingClient, LlmClient};
use docchat_index::create_embedding_client;
use docchat_ingest::{
    ArticleSource, DocumentExtractor, HttpArticleFetcher, PdfExtractor, SplitterConfig,
};
use docchat_rag::{create_llm_client, RagEngine, SessionSlot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// RAG answer engine (owns the LLM and embedding clients)
    pub engine: RagEngine,
    /// Document text extractor for uploads
    pub extractor: Arc<dyn DocumentExtractor>,
    /// Article fetcher/parser
    pub fetcher: Arc<dyn ArticleSource>,
    /// Index slot for the most recently uploaded PDF
    pub pdf_index: SessionSlot,
    /// Index slot for the most recently loaded article
    pub article_index: SessionSlot,
}

impl AppState {
    /// Create application state with injected collaborators
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingClient>,
        extractor: Arc<dyn DocumentExtractor>,
        fetcher: Arc<dyn ArticleSource>,
    ) -> Self {
        let engine = RagEngine::new(llm, embedder, config.rag.top_k);

        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            engine,
            extractor,
            fetcher,
            pdf_index: SessionSlot::new(),
            article_index: SessionSlot::new(),
        }
    }

    /// Create application state with the real collaborators from config
    pub fn from_config(config: AppConfig) -> docchat_core::Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::from(create_llm_client(&config.llm)?);
        let embedder: Arc<dyn EmbeddingClient> = Arc::from(create_embedding_client(&config.llm)?);
        let extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor);
        let fetcher: Arc<dyn ArticleSource> =
            Arc::new(HttpArticleFetcher::new(config.server.fetch_timeout_secs));

        Ok(Self::new(config, llm, embedder, extractor, fetcher))
    }

    /// Splitter parameters from config (shared by both flows)
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig {
            chunk_size: self.config.rag.chunk_size,
            chunk_overlap: self.config.rag.chunk_overlap,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
