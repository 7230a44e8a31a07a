//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the job title of the posting a chunk came from.
pub const META_DESIGNATION: &str = "designation";
/// Metadata key holding `"City, State"` of the posting.
pub const META_LOCATION: &str = "location";
/// Metadata key holding the work type (remote / on-site / hybrid).
pub const META_WORK_TYPE: &str = "work_type";
/// Metadata key holding the involvement (full-time / part-time).
pub const META_INVOLVEMENT: &str = "involvement";

/// A source document containing text content and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
}

/// An immutable, retrievable segment of a [`Document`].
///
/// Two chunks with identical `content` are the same chunk for deduplication,
/// regardless of their ids or metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text body of the chunk.
    pub content: String,
    /// Metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// Look up a metadata value by key.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// The outcome of a hybrid retrieval: at most `k` chunks, unique by content.
///
/// Chunks are borrowed from the [`CorpusIndex`](crate::CorpusIndex) that
/// produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult<'a> {
    chunks: Vec<&'a Chunk>,
}

impl<'a> RetrievalResult<'a> {
    pub(crate) fn new(chunks: Vec<&'a Chunk>) -> Self {
        Self { chunks }
    }

    /// The retrieved chunks in rank order.
    pub fn chunks(&self) -> &[&'a Chunk] {
        &self.chunks
    }

    /// Iterate over the retrieved chunks in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Chunk> + '_ {
        self.chunks.iter().copied()
    }

    /// Number of retrieved chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing was retrieved.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenate chunk contents, separated by blank lines, for use as
    /// language-model context.
    pub fn to_context(&self) -> String {
        self.chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join("\n\n")
    }
}
