//! PDF text extraction using pdf-extract
//!
//! Uploads arrive as in-memory bytes, so extraction works straight from a
//! byte slice. pdf-extract marks page breaks with form feed characters;
//! pages are re-joined with newline separators.

use crate::{IngestError, Result};

/// Trait for extracting text from uploaded document bytes.
///
/// A trait at this seam keeps the extraction collaborator swappable in
/// tests; the production implementation is [`PdfExtractor`].
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// PDF text extractor backed by pdf-extract
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        extract_pdf_text(bytes)
    }
}

/// Extract the full text of a PDF from its raw bytes.
///
/// Page texts are concatenated with `\n` separators. Malformed input
/// surfaces as [`IngestError::Pdf`] with the extractor's message.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| IngestError::Pdf(e.to_string()))?;

    Ok(join_pages(&text))
}

/// Re-join form-feed separated page texts with newlines.
fn join_pages(text: &str) -> String {
    if !text.contains('\x0C') {
        return text.to_string();
    }

    text.split('\x0C')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
