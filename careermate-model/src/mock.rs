//! A deterministic [`TextGenerator`] for tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::generator::{GenerateRequest, TextGenerator};

/// Returns a fixed answer (or a fixed error) and records every request.
///
/// # Example
///
/// ```rust,ignore
/// use careermate_model::{GenerateRequest, MockGenerator, TextGenerator};
///
/// let model = MockGenerator::new("- SQL\n- Python");
/// let answer = model.generate(GenerateRequest::new("system", "input")).await?;
/// assert_eq!(answer, "- SQL\n- Python");
/// assert_eq!(model.call_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockGenerator {
    name: String,
    outcome: Result<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockGenerator {
    /// A generator that always answers `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_outcome(Ok(response.into()))
    }

    /// A generator whose every call fails with `error`.
    pub fn failing(error: ModelError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String>) -> Self {
        Self { name: "mock".to_string(), outcome, delay: None, requests: Mutex::new(Vec::new()) }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
