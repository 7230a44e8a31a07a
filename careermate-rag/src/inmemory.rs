//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], an exhaustive-scan store
//! backed by a `BTreeMap` protected by a `tokio::sync::RwLock`. A job corpus
//! of a few thousand chunks scans in well under a millisecond.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{RagError, Result};
use crate::vectorstore::{VectorEntry, VectorHit, VectorStore};

/// An in-memory vector store using cosine similarity for search.
///
/// Entries are kept ordered by chunk position, so search results are
/// deterministic: ties keep corpus order.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    entries: RwLock<BTreeMap<usize, Vec<f32>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store accepting vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, entries: RwLock::new(BTreeMap::new()) }
    }

    /// The vector width this store accepts.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn dimension_error(&self, found: usize) -> RagError {
        RagError::VectorStoreError {
            backend: "InMemory".to_string(),
            message: format!("expected {}-dimensional vector, got {found}", self.dimensions),
        }
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn upsert(&self, entries: &[VectorEntry]) -> Result<()> {
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != self.dimensions) {
            return Err(self.dimension_error(bad.embedding.len()));
        }
        let mut store = self.entries.write().await;
        for entry in entries {
            store.insert(entry.position, entry.embedding.clone());
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<VectorHit>> {
        if embedding.len() != self.dimensions {
            return Err(self.dimension_error(embedding.len()));
        }

        let store = self.entries.read().await;
        let mut hits: Vec<VectorHit> = store
            .iter()
            .map(|(position, stored)| VectorHit {
                position: *position,
                score: cosine_similarity(stored, embedding),
            })
            .collect();

        // Stable sort: equal scores keep ascending position order.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(position: usize, embedding: Vec<f32>) -> VectorEntry {
        VectorEntry { position, embedding }
    }

    #[tokio::test]
    async fn search_orders_by_similarity() {
        let store = InMemoryVectorStore::new(2);
        store
            .upsert(&[entry(0, vec![0.0, 1.0]), entry(1, vec![1.0, 0.0]), entry(2, vec![0.7, 0.7])])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.iter().map(|h| h.position).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn ties_keep_position_order() {
        let store = InMemoryVectorStore::new(2);
        store
            .upsert(&[entry(3, vec![1.0, 0.0]), entry(1, vec![1.0, 0.0]), entry(2, vec![1.0, 0.0])])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 3).await.unwrap();
        assert_eq!(hits.iter().map(|h| h.position).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_position() {
        let store = InMemoryVectorStore::new(2);
        store.upsert(&[entry(0, vec![1.0, 0.0])]).await.unwrap();
        store.upsert(&[entry(0, vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
        let hits = store.search(&[0.0, 1.0], 1).await.unwrap();
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn rejects_wrong_dimensions() {
        let store = InMemoryVectorStore::new(3);
        let err = store.upsert(&[entry(0, vec![1.0])]).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
        assert!(store.search(&[1.0, 0.0], 1).await.is_err());
    }
}
