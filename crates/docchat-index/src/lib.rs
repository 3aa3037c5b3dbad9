//! docchat Index - In-memory vector index
//!
//! Provides the similarity-searchable chunk collection behind both Q&A
//! flows. The index lives entirely in process memory: it is built wholesale
//! from a chunk list and replaced wholesale on every upload/load, never
//! merged or appended to.

use docchat_core::{DocChatError, EmbeddingClient, Result};

pub mod embedding;

pub use embedding::{create_embedding_client, OllamaEmbedding, OpenAiEmbedding};

/// A text chunk paired with its embedding
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub content: String,
    pub vector: Vec<f32>,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
}

/// An immutable similarity-searchable collection of embedded text chunks.
///
/// Built once from a full chunk list; the only query operation is top-k
/// retrieval by cosine similarity to a query string.
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Embed `chunks` in one batch and build a fresh index from them.
    pub async fn build(chunks: Vec<String>, embedder: &dyn EmbeddingClient) -> Result<Self> {
        let vectors = embedder.embed_batch(&chunks).await?;

        if vectors.len() != chunks.len() {
            return Err(DocChatError::EmbeddingError(format!(
                "embedding count mismatch: {} texts, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let chunks = chunks
            .into_iter()
            .zip(vectors)
            .map(|(content, vector)| IndexedChunk { content, vector })
            .collect();

        Ok(Self { chunks })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Retrieve the `k` chunks most similar to `query`.
    ///
    /// Results are ordered by descending cosine similarity. Fewer than `k`
    /// chunks are returned when the index is smaller than `k`.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn EmbeddingClient,
    ) -> Result<Vec<ScoredChunk>> {
        let query_vector = embedder.embed(query).await?;
        Ok(self.search(&query_vector, k))
    }

    /// Top-k search against a precomputed query vector.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                content: chunk.content.clone(),
                score: cosine_similarity(&chunk.vector, query_vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
