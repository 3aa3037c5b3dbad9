//! docchat Ingest - Text extraction and chunking
//!
//! Everything that turns a source document into indexable text chunks:
//! - PDF text extraction (bytes in, page text out)
//! - Article download and body-text extraction from HTML
//! - Two text splitters: fixed-size windows and boundary-aware merging
//! - URL detection used by the article endpoints

use thiserror::Error;

pub mod article;
pub mod pdf;
pub mod splitter;

pub use article::{extract_url, ArticleSource, HttpArticleFetcher};
pub use pdf::{extract_pdf_text, DocumentExtractor, PdfExtractor};
pub use splitter::{split_boundary, split_fixed, SplitterConfig};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during ingestion
#[derive(Error, Debug)]
pub enum IngestError {
    /// PDF extraction error
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// Network failure while downloading an article
    #[error("failed to download article: {0}")]
    Fetch(String),

    /// The downloaded content could not be parsed into article text
    #[error("failed to parse article content: {0}")]
    Parse(String),

    /// Extraction succeeded but produced no text
    #[error("document contained no extractable text")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl From<IngestError> for docchat_core::DocChatError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Pdf(msg) => docchat_core::DocChatError::PdfError(msg),
            other => docchat_core::DocChatError::ArticleError(other.to_string()),
        }
    }
}
