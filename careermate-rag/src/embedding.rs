//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (local hashing, OpenAI,
/// etc.) behind a unified async interface. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) implementation calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends that support
/// native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use careermate_rag::{EmbeddingProvider, HashEmbeddingProvider};
///
/// let provider = HashEmbeddingProvider::new(384);
/// let embedding = provider.embed("senior data analyst").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Must return exactly one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
