//! Error types for the `careermate-rag` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building or querying the corpus index.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding service failed (network, auth, malformed response).
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the dense vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Job postings could not be read or split into chunks.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The corpus index could not be built or loaded.
    ///
    /// Fatal at startup: a retriever is never constructed over a partial index.
    #[error("Corpus index unavailable: {0}")]
    IndexUnavailable(String),

    /// A retrieval step exceeded the caller-imposed deadline.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// The deadline that was exceeded.
        timeout: Duration,
    },
}

impl RagError {
    /// Whether this error came from a remote capability call (embedding service
    /// or vector store) rather than from local data.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            RagError::EmbeddingError { .. }
                | RagError::VectorStoreError { .. }
                | RagError::Timeout { .. }
        )
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
