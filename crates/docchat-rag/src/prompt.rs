//! Grounding prompt construction
//!
//! The exact wording matters to downstream behavior, so these are the only
//! places prompts are assembled.

use docchat_core::ChatMessage;
use docchat_index::ScoredChunk;

/// System instruction for the free-form chat endpoint
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a smart AI assistant. \
Always answer questions in detail, presented clearly, broken into small \
sections or bullet points where appropriate. Explain thoroughly but in an \
easy-to-understand way.";

/// Question substituted when a bare URL triggers an article auto-load
pub const DEFAULT_ARTICLE_QUESTION: &str = "Summarize the article's content";

/// Build the two-message conversation for the chat endpoint.
pub fn chat_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CHAT_SYSTEM_INSTRUCTION),
        ChatMessage::user(prompt),
    ]
}

/// Join retrieved chunk texts into a single context block.
pub fn join_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Grounding prompt for PDF questions.
pub fn pdf_prompt(context: &str, query: &str) -> String {
    format!(
        "Based on the following content, answer the question:\n\n{context}\n\nQuestion: {query}"
    )
}

/// Grounding prompt for article questions.
pub fn article_prompt(context: &str, question: &str) -> String {
    format!(
        "Below is the article content:\n{context}\n\nBased on that, answer the following \
         question in detail, breaking it into points where helpful:\n{question}"
    )
}
