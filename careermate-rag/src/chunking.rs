//! Document chunking.
//!
//! [`RecursiveChunker`] splits a posting into bounded, overlapping chunks:
//! paragraphs first, then lines, sentences, and words, falling back to a
//! plain character window for text with no usable separator. Sizes are
//! counted in characters, never bytes, so multi-byte text is split safely.

use std::collections::VecDeque;

use crate::config::RagConfig;
use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no non-whitespace text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;

    /// Split many documents, preserving document order.
    fn chunk_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|document| self.chunk(document)).collect()
    }
}

const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits text hierarchically with a character budget and overlap.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use careermate_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(500, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk (at least 1)
    /// * `chunk_overlap`: characters carried over between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size: chunk_size.max(1), chunk_overlap }
    }

    /// Create a chunker using the size and overlap from a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        split_recursive(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .enumerate()
            .map(|(i, content)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    content,
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` at the first separator it contains, merging the pieces back
/// into windows of at most `chunk_size` characters. Pieces that are still too
/// large are split again with the remaining separators.
fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }

    let Some(position) = separators.iter().position(|sep| text.contains(sep)) else {
        return split_by_chars(text, chunk_size, chunk_overlap);
    };
    let separator = separators[position];
    let remaining = &separators[position + 1..];

    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut window_len = 0;

    for segment in split_keeping_separator(text, separator) {
        let segment_len = char_len(segment);

        if segment_len > chunk_size {
            if !window.is_empty() {
                chunks.push(window.iter().copied().collect::<String>());
                window.clear();
                window_len = 0;
            }
            chunks.extend(split_recursive(segment, chunk_size, chunk_overlap, remaining));
            continue;
        }

        if window_len + segment_len > chunk_size && !window.is_empty() {
            chunks.push(window.iter().copied().collect::<String>());
            // Keep a tail of at most `chunk_overlap` characters that still
            // leaves room for the incoming segment.
            while window_len > chunk_overlap || window_len + segment_len > chunk_size {
                let Some(front) = window.pop_front() else { break };
                window_len -= char_len(front);
            }
        }

        window.push_back(segment);
        window_len += segment_len;
    }

    if !window.is_empty() {
        chunks.push(window.iter().copied().collect::<String>());
    }

    chunks
}

/// Split text at a separator while keeping the separator attached to the preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character window splitting with overlap.
fn split_by_chars(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "posting_7".to_string(),
            text: text.to_string(),
            metadata: HashMap::from([("designation".to_string(), "Data Analyst".to_string())]),
        }
    }

    #[test]
    fn short_document_is_a_single_chunk() {
        let chunks = RecursiveChunker::new(500, 50).chunk(&doc("Job Title: Data Analyst\n"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Job Title: Data Analyst");
        assert_eq!(chunks[0].id, "posting_7_0");
        assert_eq!(chunks[0].document_id, "posting_7");
        assert_eq!(chunks[0].meta("designation"), Some("Data Analyst"));
        assert_eq!(chunks[0].meta("chunk_index"), Some("0"));
    }

    #[test]
    fn empty_document_produces_no_chunks() {
        assert!(RecursiveChunker::new(100, 10).chunk(&doc("  \n ")).is_empty());
    }

    #[test]
    fn chunks_never_exceed_chunk_size() {
        let text = "Requires SQL and Python. ".repeat(80);
        let chunks = RecursiveChunker::new(120, 20).chunk(&doc(&text));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 120, "{}", chunk.content);
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let text = (0..60).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let chunks = RecursiveChunker::new(60, 20).chunk(&doc(&text));
        assert!(chunks.len() > 1);
        let last_word_of_first = chunks[0].content.split(' ').next_back().unwrap();
        assert!(chunks[1].content.contains(last_word_of_first));
    }

    #[test]
    fn multibyte_text_without_separators_is_split_on_char_boundaries() {
        let text = "é".repeat(250);
        let chunks = RecursiveChunker::new(100, 10).chunk(&doc(&text));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 100));
    }

    #[test]
    fn chunk_all_preserves_document_order() {
        let chunker = RecursiveChunker::new(500, 50);
        let mut second = doc("second");
        second.id = "posting_8".to_string();
        let chunks = chunker.chunk_all(&[doc("first"), second]);
        assert_eq!(chunks[0].content, "first");
        assert_eq!(chunks[1].content, "second");
    }
}
