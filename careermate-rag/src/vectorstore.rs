//! Vector store trait backing the dense half of the corpus index.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An embedding stored under the position of its chunk in the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorEntry {
    /// Index of the chunk in the corpus chunk sequence.
    pub position: usize,
    /// The chunk's embedding.
    pub embedding: Vec<f32>,
}

/// A similarity hit returned by [`VectorStore::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorHit {
    /// Index of the chunk in the corpus chunk sequence.
    pub position: usize,
    /// Similarity score (higher is more relevant).
    pub score: f32,
}

/// A storage backend for chunk embeddings with nearest-neighbor search.
///
/// Entries are keyed by chunk position so the store can never disagree with
/// the corpus about which chunk an embedding belongs to.
///
/// # Example
///
/// ```rust,ignore
/// use careermate_rag::{InMemoryVectorStore, VectorEntry, VectorStore};
///
/// let store = InMemoryVectorStore::new(384);
/// store.upsert(&[VectorEntry { position: 0, embedding }]).await?;
/// let hits = store.search(&query_embedding, 10).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Insert or replace embeddings.
    async fn upsert(&self, entries: &[VectorEntry]) -> Result<()>;

    /// Number of stored embeddings.
    async fn len(&self) -> Result<usize>;

    /// Search for the `top_k` most similar entries to the given embedding.
    ///
    /// Returns hits ordered by descending similarity; equal scores are
    /// ordered by ascending position.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<VectorHit>>;
}
