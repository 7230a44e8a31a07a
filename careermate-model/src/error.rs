//! Error types for the `careermate-model` crate.

use std::time::Duration;

use thiserror::Error;

/// A failed language-model call.
///
/// Every variant is a transport failure from the caller's point of view: the
/// request is abandoned and nothing is retried at this layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// The request never produced an HTTP response.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response carried no completion text.
    #[error("model returned no content")]
    EmptyContent,

    #[error("Configuration error: {0}")]
    Config(String),

    /// The call did not complete within the configured deadline.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

/// A convenience result type for generation calls.
pub type Result<T> = std::result::Result<T, ModelError>;
