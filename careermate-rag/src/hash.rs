//! Local feature-hashing embeddings.
//!
//! Tokens and adjacent-token bigrams are hashed with FNV-1a into a signed
//! bag-of-features vector, then L2-normalized. No model weights or network
//! access, and fully deterministic, which makes it the default embedder for
//! offline corpus builds and tests.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

const DEFAULT_DIMENSIONS: usize = 384;
const BIGRAM_WEIGHT: f32 = 0.5;

/// An [`EmbeddingProvider`] based on FNV-1a feature hashing.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: DEFAULT_DIMENSIONS }
    }
}

impl HashEmbeddingProvider {
    /// Create a provider producing vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Embed text synchronously.
    ///
    /// Text with no tokens of two or more characters yields the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let tokens = tokenize(text);
        for token in &tokens {
            accumulate(&mut embedding, token, 1.0);
        }
        for pair in tokens.windows(2) {
            accumulate(&mut embedding, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    fn name(&self) -> &str {
        "Hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

fn accumulate(embedding: &mut [f32], feature: &str, weight: f32) {
    let feature_hash = fnv1a(feature.as_bytes());
    let dims = embedding.len();

    // Four signed projections per feature keep collisions from cancelling out.
    for salt in 0..4u64 {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&feature_hash.to_le_bytes());
        bytes[8..].copy_from_slice(&salt.to_le_bytes());
        let h = fnv1a(&bytes);
        let sign = if h & 1 == 0 { weight } else { -weight };
        embedding[((h >> 1) as usize) % dims] += sign;
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory::cosine_similarity;

    #[test]
    fn fnv1a_known_value() {
        assert_eq!(fnv1a(b"hello"), 0xa430d84680aabd0b);
    }

    #[test]
    fn embeddings_have_requested_dimensions_and_unit_norm() {
        let provider = HashEmbeddingProvider::new(64);
        let embedding = provider.embed_text("data analyst sql python");
        assert_eq!(embedding.len(), 64);
        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[test]
    fn text_without_tokens_embeds_to_zero() {
        let embedding = HashEmbeddingProvider::new(32).embed_text("a b - c");
        assert!(embedding.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn related_text_scores_higher() {
        let provider = HashEmbeddingProvider::new(256);
        let query = provider.embed_text("sql data analyst");
        let related = provider.embed_text("data analyst with sql and excel");
        let unrelated = provider.embed_text("unity game developer c#");
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn batch_matches_single_embeddings() {
        let provider = HashEmbeddingProvider::default();
        let batch = provider.embed_batch(&["java developer", "machine learning"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("java developer").await.unwrap());
    }
}
