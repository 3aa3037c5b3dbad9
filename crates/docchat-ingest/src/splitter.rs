//! Text splitters
//!
//! Two variants with the same size/overlap parameters but different
//! boundary behavior:
//!
//! - [`split_fixed`]: fixed-size character windows, no boundary awareness
//!   (used for PDF text).
//! - [`split_boundary`]: splits at sentence and paragraph boundaries, then
//!   merges pieces up to the size limit (used for article text).
//!
//! Sizes and overlaps are measured in characters.

/// Splitter parameters shared by both variants
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Overlap with the previous chunk in characters
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

/// Split text into fixed-size character windows with overlap.
pub fn split_fixed(text: &str, config: &SplitterConfig) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = config
        .chunk_size
        .saturating_sub(config.chunk_overlap)
        .max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

/// Split text at natural boundaries, merging pieces up to the size limit.
///
/// Pieces are sentences (terminated by `.`, `!` or `?` followed by
/// whitespace) or paragraphs (blank-line separated). Consecutive pieces are
/// packed into a chunk until adding the next one would exceed `chunk_size`;
/// the tail pieces of the finished chunk are carried over as overlap.
pub fn split_boundary(text: &str, config: &SplitterConfig) -> Vec<String> {
    let pieces = sentence_pieces(text);
    if pieces.is_empty() {
        return Vec::new();
    }

    merge_pieces(&pieces, config.chunk_size, config.chunk_overlap)
}

/// Break text into sentence/paragraph pieces, preserving all characters.
fn sentence_pieces(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        let next = chars.get(i + 1).copied();
        let paragraph_break = c == '\n' && next == Some('\n');
        let sentence_end =
            matches!(c, '.' | '!' | '?') && matches!(next, Some(' ') | Some('\n'));

        if paragraph_break {
            current.push('\n');
            i += 1;
        }

        if (paragraph_break || sentence_end) && !current.trim().is_empty() {
            pieces.push(std::mem::take(&mut current));
        }

        i += 1;
    }

    if !current.trim().is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Pack pieces into chunks of at most `chunk_size` characters, carrying the
/// last pieces of each finished chunk forward as overlap.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    // First piece index contributing to the current chunk; overlap never
    // reaches further back than this.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        let piece_len = piece.chars().count();

        if current_len > 0 && current_len + piece_len > chunk_size {
            chunks.push(std::mem::take(&mut current));

            // Walk backwards to collect overlap pieces
            let mut carried = 0;
            let mut from = idx;
            for i in (window_start..idx).rev() {
                let len = pieces[i].chars().count();
                if carried + len > chunk_overlap {
                    break;
                }
                carried += len;
                from = i;
            }

            current_len = 0;
            for p in &pieces[from..idx] {
                current.push_str(p);
                current_len += p.chars().count();
            }
            window_start = from;
        }

        current.push_str(piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
