//! Hybrid retrieval: dense and sparse top-k, fused dense-first.
//!
//! For a query and bound `k`, the retriever takes the dense top-`k` and the
//! BM25 top-`k`, concatenates them dense-first, drops every chunk whose
//! content was already seen, and truncates to `k`. A chunk found by both
//! halves therefore keeps its dense rank.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::corpus::CorpusIndex;
use crate::document::{Chunk, RetrievalResult};
use crate::error::{RagError, Result};

/// Retrieves deduplicated, size-bounded chunk lists from a shared [`CorpusIndex`].
///
/// # Example
///
/// ```rust,ignore
/// let retriever = HybridRetriever::new(Arc::new(index), 20);
/// let result = retriever.retrieve("What are the required skills for a data analyst?").await?;
/// println!("{}", result.to_context());
/// ```
#[derive(Debug, Clone)]
pub struct HybridRetriever {
    index: Arc<CorpusIndex>,
    default_k: usize,
    timeout: Option<Duration>,
}

impl HybridRetriever {
    /// Create a retriever over `index` returning at most `default_k` chunks per query.
    pub fn new(index: Arc<CorpusIndex>, default_k: usize) -> Self {
        Self { index, default_k, timeout: None }
    }

    /// Fail dense retrieval with [`RagError::Timeout`] if it takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The shared index this retriever reads.
    pub fn index(&self) -> &Arc<CorpusIndex> {
        &self.index
    }

    /// The bound used by [`retrieve`](Self::retrieve).
    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Retrieve with the default bound.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalResult<'_>> {
        self.retrieve_k(query, self.default_k).await
    }

    /// Retrieve at most `k` chunks for `query`.
    ///
    /// A query that matches nothing is not an error: BM25 still ranks every
    /// chunk, so the result is empty only when the corpus is.
    ///
    /// # Errors
    ///
    /// Propagates embedding-service and vector-store failures, and returns
    /// [`RagError::Timeout`] if a configured deadline passes first.
    pub async fn retrieve_k(&self, query: &str, k: usize) -> Result<RetrievalResult<'_>> {
        if k == 0 {
            return Ok(RetrievalResult::default());
        }

        let dense = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.index.dense_search(query, k))
                .await
                .map_err(|_| {
                    error!(?timeout, "dense retrieval timed out");
                    RagError::Timeout { operation: "dense retrieval", timeout }
                })?,
            None => self.index.dense_search(query, k).await,
        }
        .inspect_err(|e| error!(error = %e, "dense retrieval failed"))?;
        let sparse = self.index.sparse_search(query, k);
        debug!(dense = dense.len(), sparse = sparse.len(), "retrieved candidates");

        let chunks = fuse(
            dense.iter().chain(sparse.iter()).filter_map(|p| self.index.chunk(*p)),
            k,
        );
        info!(result_count = chunks.len(), k, "hybrid retrieval completed");
        Ok(RetrievalResult::new(chunks))
    }
}

/// Keep the first chunk for each distinct content, up to `k` chunks.
fn fuse<'a>(candidates: impl Iterator<Item = &'a Chunk>, k: usize) -> Vec<&'a Chunk> {
    let mut seen: HashSet<&str> = HashSet::new();
    candidates.filter(|chunk| seen.insert(chunk.content.as_str())).take(k).collect()
}
