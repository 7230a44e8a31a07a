//! The text-generation capability consumed by structured extraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One generation call: a system directive plus the user's input.
///
/// The system directive carries the task instructions and any retrieved
/// context; `input` is the natural-language request itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub input: String,
}

impl GenerateRequest {
    pub fn new(system_instruction: impl Into<String>, input: impl Into<String>) -> Self {
        Self { system_instruction: system_instruction.into(), input: input.into() }
    }
}

/// An asynchronous text-completion backend.
///
/// Implementations make exactly one attempt per call and report every
/// failure as a [`ModelError`](crate::ModelError).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Produce the model's answer text for `request`.
    async fn generate(&self, request: GenerateRequest) -> Result<String>;
}
