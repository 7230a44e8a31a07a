//! Embeddings from an OpenAI-compatible `/embeddings` endpoint.
//!
//! Shares the `API_KEY` / `BASE_URL` environment contract with the chat
//! client, so one deployment serves both generation and embedding. The
//! corpus width is pinned up front: every returned vector is checked against
//! [`dimensions`](EmbeddingProvider::dimensions) before it reaches an index.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Model used when `EMBEDDING_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Output width of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

const PROVIDER: &str = "OpenAI";

/// Batched embeddings over HTTP, with one vector per input in input order.
///
/// ```rust,ignore
/// let provider = OpenAIEmbeddingProvider::from_env()?.with_dimensions(512);
/// let index = CorpusIndex::builder().embedding_provider(Arc::new(provider)).build(chunks).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    dimensions: usize,
    /// Sent as `dimensions` so the server shortens its vectors to match.
    shortened: bool,
    timeout: Option<Duration>,
}

impl OpenAIEmbeddingProvider {
    /// A provider for `{base_url}/embeddings` using the default model and width.
    pub fn new(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let api_key = api_key.into();
        let base_url = base_url.as_ref().trim_end_matches('/');
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("embedding api_key must not be empty".into()));
        }
        if base_url.is_empty() {
            return Err(RagError::ConfigError("embedding base_url must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!("{base_url}/embeddings"),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            shortened: false,
            timeout: None,
        })
    }

    /// Build from `API_KEY` and `BASE_URL`, with `EMBEDDING_MODEL` optional.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] naming every required variable that
    /// is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let provider = match (read("API_KEY"), read("BASE_URL")) {
            (Some(api_key), Some(base_url)) => Self::new(api_key, base_url)?,
            (api_key, _) => {
                let missing = if api_key.is_none() { "API_KEY" } else { "BASE_URL" };
                return Err(RagError::ConfigError(format!(
                    "missing environment variable for embeddings: {missing}"
                )));
            }
        };
        Ok(match read("EMBEDDING_MODEL") {
            Some(model) => provider.with_model(model),
            None => provider,
        })
    }

    /// Use another model. The width is left unchanged; set it with
    /// [`with_dimensions`](Self::with_dimensions) if the model differs.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask the server for `dims`-wide vectors and expect exactly that width.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.shortened = true;
        self
    }

    /// Fail a request with [`RagError::Timeout`] once `timeout` has passed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn transport_error(&self, e: reqwest::Error) -> RagError {
        match self.timeout {
            Some(timeout) if e.is_timeout() => {
                RagError::Timeout { operation: "embedding", timeout }
            }
            _ => embedding_error(format!("request failed: {e}")),
        }
    }
}

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Place each returned vector at its `index`, rejecting gaps, duplicates,
/// out-of-range indices, and vectors of the wrong width.
fn into_input_order(
    data: Vec<EmbeddingData>,
    inputs: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut slots: Vec<Option<Vec<f32>>> = vec![None; inputs];
    for item in data {
        let index = item.index;
        let slot = slots
            .get_mut(index)
            .ok_or_else(|| embedding_error(format!("index {index} outside batch of {inputs}")))?;
        if slot.is_some() {
            return Err(embedding_error(format!("index {index} returned twice")));
        }
        if item.embedding.len() != dimensions {
            return Err(embedding_error(format!(
                "expected {dimensions} dimensions, got {}",
                item.embedding.len()
            )));
        }
        *slot = Some(item.embedding);
    }
    let returned = slots.iter().filter(|s| s.is_some()).count();
    if returned != inputs {
        return Err(embedding_error(format!("returned {returned} of {inputs} embeddings")));
    }
    Ok(slots.into_iter().flatten().collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| embedding_error("no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            provider = PROVIDER,
            model = %self.model,
            batch_size = texts.len(),
            "embedding batch"
        );

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.shortened.then_some(self.dimensions),
        };
        let mut request = self.client.post(&self.endpoint).bearer_auth(&self.api_key).json(&body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "embedding request failed");
            self.transport_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            error!(provider = PROVIDER, %status, %message, "embedding API error");
            return Err(embedding_error(format!("API returned {status}: {message}")));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "unreadable embedding response");
            embedding_error(format!("unreadable response: {e}"))
        })?;
        into_input_order(parsed.data, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
