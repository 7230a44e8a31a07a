//! The corpus index: one chunk sequence backing a dense and a sparse structure.
//!
//! A [`CorpusIndex`] is built once (from chunks, documents, or a saved
//! [`CorpusSnapshot`]) and is read-only afterwards, so it can be shared
//! behind an `Arc` by any number of concurrent retrievals without locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use careermate_rag::{
//!     CorpusIndex, HashEmbeddingProvider, postings_to_documents, read_postings_csv,
//! };
//!
//! let postings = read_postings_csv(std::fs::File::open("IT_jobs.csv")?)?;
//! let index = CorpusIndex::builder()
//!     .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!     .build_from_documents(&postings_to_documents(&postings))
//!     .await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::sparse::Bm25Index;
use crate::vectorstore::{VectorEntry, VectorStore};

/// Chunks plus their embeddings, as produced by an offline corpus build.
///
/// Loading a snapshot restores both retrieval structures without calling the
/// embedding service again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusSnapshot {
    /// Width of every embedding.
    pub dimensions: usize,
    /// The corpus chunk sequence.
    pub chunks: Vec<Chunk>,
    /// `embeddings[i]` is the embedding of `chunks[i]`.
    pub embeddings: Vec<Vec<f32>>,
}

impl CorpusSnapshot {
    /// Embed `chunks` with `provider`, `batch_size` texts per request.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnavailable`] if the provider fails or returns
    /// the wrong number or width of vectors.
    pub async fn create(
        chunks: Vec<Chunk>,
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self> {
        let dimensions = provider.dimensions();
        let mut embeddings = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(batch_size.max(1)) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = provider.embed_batch(&texts).await.map_err(|e| {
                error!(
                    provider = provider.name(),
                    error = %e,
                    "embedding failed during corpus build"
                );
                RagError::IndexUnavailable(format!("embedding failed: {e}"))
            })?;
            if vectors.len() != batch.len() {
                return Err(RagError::IndexUnavailable(format!(
                    "provider '{}' returned {} embeddings for {} chunks",
                    provider.name(),
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
            debug!(embedded = embeddings.len(), total = chunks.len(), "embedded chunk batch");
        }

        let snapshot = Self { dimensions, chunks, embeddings };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that every chunk has exactly one embedding of the declared width.
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.len() != self.chunks.len() {
            return Err(RagError::IndexUnavailable(format!(
                "snapshot has {} embeddings for {} chunks",
                self.embeddings.len(),
                self.chunks.len()
            )));
        }
        if let Some((i, bad)) =
            self.embeddings.iter().enumerate().find(|(_, e)| e.len() != self.dimensions)
        {
            return Err(RagError::IndexUnavailable(format!(
                "embedding {i} has {} dimensions, expected {}",
                bad.len(),
                self.dimensions
            )));
        }
        Ok(())
    }

    /// Write the snapshot as JSON.
    pub async fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec(self).map_err(|e| {
            RagError::IndexUnavailable(format!("failed to encode corpus snapshot: {e}"))
        })?;
        tokio::fs::write(path, bytes).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to write corpus snapshot");
            RagError::IndexUnavailable(format!("failed to write '{}': {e}", path.display()))
        })?;
        info!(path = %path.display(), chunk_count = self.chunks.len(), "wrote corpus snapshot");
        Ok(())
    }

    /// Read and validate a snapshot previously written by [`write_json`](Self::write_json).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnavailable`] if the file is missing,
    /// undecodable, or inconsistent.
    pub async fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to read corpus snapshot");
            RagError::IndexUnavailable(format!("failed to read '{}': {e}", path.display()))
        })?;
        let snapshot: Self = serde_json::from_slice(&bytes).map_err(|e| {
            RagError::IndexUnavailable(format!("failed to decode '{}': {e}", path.display()))
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// The read-only corpus: chunk sequence, dense vector store, and BM25 index.
pub struct CorpusIndex {
    chunks: Vec<Chunk>,
    sparse: Bm25Index,
    dense: Arc<dyn VectorStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("chunks", &self.chunks.len())
            .field("vocabulary", &self.sparse.vocabulary_size())
            .field("vector_store", &self.dense.name())
            .field("embedding_provider", &self.embedding_provider.name())
            .finish()
    }
}

impl CorpusIndex {
    /// Create a new [`CorpusIndexBuilder`].
    pub fn builder() -> CorpusIndexBuilder {
        CorpusIndexBuilder::default()
    }

    /// The chunk sequence both structures were built over.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The chunk at `position`, if any.
    pub fn chunk(&self, position: usize) -> Option<&Chunk> {
        self.chunks.get(position)
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the corpus has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The provider used to embed both the corpus and incoming queries.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Positions of the `top_k` chunks most similar to `query` by embedding.
    ///
    /// # Errors
    ///
    /// Propagates embedding-service and vector-store failures unchanged.
    pub async fn dense_search(&self, query: &str, top_k: usize) -> Result<Vec<usize>> {
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedding_provider.embed(query).await?;
        let hits = self.dense.search(&query_embedding, top_k).await?;
        Ok(hits.into_iter().map(|h| h.position).filter(|p| *p < self.chunks.len()).collect())
    }

    /// Positions of the `top_k` chunks with the highest BM25 score for `query`.
    pub fn sparse_search(&self, query: &str, top_k: usize) -> Vec<usize> {
        self.sparse.top_k(query, top_k)
    }
}

/// Builder for constructing a [`CorpusIndex`].
///
/// The embedding provider is required. The vector store defaults to an
/// [`InMemoryVectorStore`] sized to the provider, and the config to
/// [`RagConfig::default()`].
#[derive(Default)]
pub struct CorpusIndexBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl CorpusIndexBuilder {
    /// Set the chunking, batching, and BM25 configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the dense vector store backend. It must start out empty.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Chunk `documents` with a [`RecursiveChunker`] and build the index.
    pub async fn build_from_documents(self, documents: &[Document]) -> Result<CorpusIndex> {
        let config = self.config.clone().unwrap_or_default();
        let chunks = RecursiveChunker::from_config(&config).chunk_all(documents);
        info!(document_count = documents.len(), chunk_count = chunks.len(), "chunked corpus");
        self.build(chunks).await
    }

    /// Embed `chunks` and build the index over them.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnavailable`] if embedding or indexing fails,
    /// or [`RagError::ConfigError`] if no embedding provider was set.
    pub async fn build(self, chunks: Vec<Chunk>) -> Result<CorpusIndex> {
        let provider = self.require_provider()?;
        let batch_size = self.config.as_ref().map_or_else(
            || RagConfig::default().embedding_batch_size,
            |c| c.embedding_batch_size,
        );
        let snapshot = CorpusSnapshot::create(chunks, provider.as_ref(), batch_size).await?;
        self.load(snapshot).await
    }

    /// Restore an index from a snapshot without re-embedding the chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexUnavailable`] if the snapshot is inconsistent,
    /// its width differs from the provider's, the vector store is not empty,
    /// or the store rejects the embeddings.
    pub async fn load(self, snapshot: CorpusSnapshot) -> Result<CorpusIndex> {
        let provider = self.require_provider()?;
        let config = self.config.unwrap_or_default();
        snapshot.validate()?;

        if snapshot.dimensions != provider.dimensions() {
            return Err(RagError::IndexUnavailable(format!(
                "snapshot embeddings have {} dimensions but provider '{}' produces {}",
                snapshot.dimensions,
                provider.name(),
                provider.dimensions()
            )));
        }

        let dense = self
            .vector_store
            .unwrap_or_else(|| Arc::new(InMemoryVectorStore::new(provider.dimensions())));

        let existing = dense.len().await.map_err(index_unavailable)?;
        if existing != 0 {
            return Err(RagError::IndexUnavailable(format!(
                "vector store '{}' already holds {existing} embeddings",
                dense.name()
            )));
        }

        let CorpusSnapshot { chunks, embeddings, .. } = snapshot;
        let entries: Vec<VectorEntry> = embeddings
            .into_iter()
            .enumerate()
            .map(|(position, embedding)| VectorEntry { position, embedding })
            .collect();
        dense.upsert(&entries).await.map_err(index_unavailable)?;

        let stored = dense.len().await.map_err(index_unavailable)?;
        if stored != chunks.len() {
            return Err(RagError::IndexUnavailable(format!(
                "vector store holds {stored} embeddings for {} chunks",
                chunks.len()
            )));
        }

        let sparse = Bm25Index::build(chunks.iter().map(|c| c.content.as_str()), config.bm25);

        info!(
            chunk_count = chunks.len(),
            vocabulary = sparse.vocabulary_size(),
            vector_store = dense.name(),
            "corpus index ready"
        );

        Ok(CorpusIndex { chunks, sparse, dense, embedding_provider: provider })
    }

    fn require_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        self.embedding_provider
            .clone()
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))
    }
}

fn index_unavailable(e: RagError) -> RagError {
    error!(error = %e, "vector store rejected corpus embeddings");
    RagError::IndexUnavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::hash::HashEmbeddingProvider;

    fn chunk(i: usize, content: &str) -> Chunk {
        Chunk {
            id: format!("c{i}"),
            content: content.to_string(),
            metadata: HashMap::new(),
            document_id: format!("d{i}"),
        }
    }

    fn provider() -> Arc<dyn EmbeddingProvider> {
        Arc::new(HashEmbeddingProvider::new(64))
    }

    #[tokio::test]
    async fn builds_both_structures_over_the_same_chunks() {
        let index = CorpusIndex::builder()
            .embedding_provider(provider())
            .build(vec![chunk(0, "Data Analyst SQL"), chunk(1, "Unity Developer C#")])
            .await
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.sparse_search("SQL", 1), vec![0]);
        assert_eq!(index.dense_search("Unity Developer C#", 1).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn empty_corpus_is_valid() {
        let index =
            CorpusIndex::builder().embedding_provider(provider()).build(Vec::new()).await.unwrap();
        assert!(index.is_empty());
        assert!(index.dense_search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_provider_is_a_config_error() {
        let err = CorpusIndex::builder().build(vec![chunk(0, "x")]).await.unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[tokio::test]
    async fn snapshot_with_wrong_width_is_rejected() {
        let snapshot = CorpusSnapshot {
            dimensions: 3,
            chunks: vec![chunk(0, "x")],
            embeddings: vec![vec![1.0, 0.0, 0.0]],
        };
        let err =
            CorpusIndex::builder().embedding_provider(provider()).load(snapshot).await.unwrap_err();
        assert!(matches!(err, RagError::IndexUnavailable(_)));
    }

    #[tokio::test]
    async fn snapshot_with_missing_embeddings_is_rejected() {
        let snapshot =
            CorpusSnapshot { dimensions: 64, chunks: vec![chunk(0, "x")], embeddings: vec![] };
        assert!(matches!(snapshot.validate(), Err(RagError::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn populated_vector_store_is_rejected() {
        let store = Arc::new(InMemoryVectorStore::new(64));
        store.upsert(&[VectorEntry { position: 9, embedding: vec![0.0; 64] }]).await.unwrap();
        let err = CorpusIndex::builder()
            .embedding_provider(provider())
            .vector_store(store)
            .build(vec![chunk(0, "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::IndexUnavailable(_)));
    }
}
