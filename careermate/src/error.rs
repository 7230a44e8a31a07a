//! Error types for the `careermate` crate.

use std::time::Duration;

use careermate_model::ModelError;
use careermate_rag::RagError;
use thiserror::Error;

/// A failed request. Only transport and index failures reach callers;
/// unparseable model output is never an error.
#[derive(Debug, Error)]
pub enum CareerError {
    /// The language-model call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Retrieval failed, or the corpus index could not be loaded.
    #[error(transparent)]
    Rag(RagError),

    /// A caller-imposed deadline passed before the step completed.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout { operation: &'static str, timeout: Duration },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CareerError {
    /// Whether a remote call (language model, embedding service, vector
    /// store) failed or ran out of time.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            CareerError::Model(_) | CareerError::Timeout { .. } => true,
            CareerError::Rag(e) => e.is_transport_failure(),
            CareerError::Config(_) => false,
        }
    }

    /// Whether the corpus index failed to build or load.
    pub fn is_index_unavailable(&self) -> bool {
        matches!(self, CareerError::Rag(RagError::IndexUnavailable(_)))
    }
}

/// Retrieval deadlines surface as [`CareerError::Timeout`], like generation ones.
impl From<RagError> for CareerError {
    fn from(error: RagError) -> Self {
        match error {
            RagError::Timeout { timeout, .. } => {
                CareerError::Timeout { operation: "retrieval", timeout }
            }
            other => CareerError::Rag(other),
        }
    }
}

/// Why one block of model output was dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The block does not follow the expected template.
    #[error("malformed record: {reason}")]
    Malformed { reason: String },

    /// The block parsed, but a required field is absent or empty.
    #[error("record is missing required field `{field}`")]
    MissingField { field: &'static str },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ParseError::Malformed { reason: reason.into() }
    }
}

/// A convenience result type for CareerMate operations.
pub type Result<T> = std::result::Result<T, CareerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_failures() {
        let model = CareerError::from(ModelError::Http("reset".into()));
        assert!(model.is_transport_failure());
        assert!(!model.is_index_unavailable());

        let index = CareerError::from(RagError::IndexUnavailable("missing".into()));
        assert!(index.is_index_unavailable());
        assert!(!index.is_transport_failure());

        let timeout =
            CareerError::Timeout { operation: "generation", timeout: Duration::from_secs(1) };
        assert!(timeout.is_transport_failure());
        assert_eq!(timeout.to_string(), "generation timed out after 1s");
    }

    #[test]
    fn retrieval_timeout_converts_to_timeout() {
        let err = CareerError::from(RagError::Timeout {
            operation: "dense retrieval",
            timeout: Duration::from_millis(50),
        });
        assert!(matches!(err, CareerError::Timeout { operation: "retrieval", .. }));
        assert!(err.is_transport_failure());
    }
}
