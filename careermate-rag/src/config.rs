//! Configuration for corpus indexing.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Okapi BM25 scoring parameters for the sparse index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f32,
    /// Document-length normalization strength, in `0.0..=1.0`.
    pub b: f32,
    /// Floor applied to negative IDF values, as a fraction of the mean IDF.
    pub epsilon: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, epsilon: 0.25 }
    }
}

/// Configuration parameters for building the corpus index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunk texts sent to the embedding provider per request.
    pub embedding_batch_size: usize,
    /// Sparse index scoring parameters.
    pub bm25: Bm25Params,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            embedding_batch_size: 64,
            bm25: Bm25Params::default(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set how many chunk texts are embedded per provider call.
    pub fn embedding_batch_size(mut self, size: usize) -> Self {
        self.config.embedding_batch_size = size;
        self
    }

    /// Override the BM25 scoring parameters.
    pub fn bm25(mut self, params: Bm25Params) -> Self {
        self.config.bm25 = params;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `embedding_batch_size == 0`
    /// - `bm25.b` is outside `0.0..=1.0` or `bm25.k1` is negative
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        if config.embedding_batch_size == 0 {
            return Err(RagError::ConfigError(
                "embedding_batch_size must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&config.bm25.b) || config.bm25.k1 < 0.0 {
            return Err(RagError::ConfigError(format!(
                "invalid bm25 parameters: k1={}, b={}",
                config.bm25.k1, config.bm25.b
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_job_corpus_preparation() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.bm25, Bm25Params { k1: 1.5, b: 0.75, epsilon: 0.25 });
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn rejects_zero_batch_size() {
        assert!(RagConfig::builder().embedding_batch_size(0).build().is_err());
    }

    #[test]
    fn rejects_out_of_range_bm25() {
        let params = Bm25Params { b: 1.5, ..Bm25Params::default() };
        assert!(RagConfig::builder().bm25(params).build().is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let config: RagConfig = serde_json::from_str(
            r#"{"chunk_size":300,"chunk_overlap":30,"embedding_batch_size":8,
                "bm25":{"k1":1.2,"b":0.75,"epsilon":0.25}}"#,
        )
        .unwrap();
        assert_eq!(config.embedding_batch_size, 8);
        assert_eq!(config.bm25.k1, 1.2);
    }
}
