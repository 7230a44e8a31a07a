//! OpenAI chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::config::OpenAIConfig;
use crate::error::{ModelError, Result};
use crate::generator::{GenerateRequest, TextGenerator};

/// [`TextGenerator`] backed by an OpenAI-compatible chat-completions endpoint.
///
/// Each call sends one system message and one user message and returns the
/// first choice's content. Failed calls are not retried.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAIClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the configuration is incomplete or the
    /// HTTP client cannot be constructed.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn chat_request<'a>(&'a self, request: &'a GenerateRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: &request.system_instruction },
                ChatMessage { role: "user", content: &request.input },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ModelError {
        match self.config.timeout {
            Some(timeout) if e.is_timeout() => ModelError::Timeout(timeout),
            _ => ModelError::Http(e.to_string()),
        }
    }
}

// ── Chat completions wire types ──────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn first_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ModelError::EmptyContent)
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        debug!(
            model = %self.config.model,
            system_len = request.system_instruction.len(),
            input_len = request.input.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&self.chat_request(&request))
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.config.model, error = %e, "chat completion request failed");
                self.transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(model = %self.config.model, %status, "chat completion API error");
            return Err(ModelError::Api { status: status.as_u16(), message });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.config.model, error = %e, "failed to decode chat completion");
            self.transport_error(e)
        })?;

        let content = first_content(parsed)?;
        info!(model = %self.config.model, response_len = content.len(), "chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAIClient {
        OpenAIClient::new(OpenAIConfig::new("key", "http://localhost:1/v1", "test-model")).unwrap()
    }

    #[test]
    fn request_body_has_system_then_user_message() {
        let client = client();
        let request = GenerateRequest::new(
            "You extract skills.",
            "What are the required skills for a Data Analyst?",
        );
        let body = serde_json::to_value(client.chat_request(&request)).unwrap();

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You extract skills.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["stream"], false);
        assert!(body.get("max_tokens").is_none());
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn empty_choice_is_empty_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(first_content(response), Err(ModelError::EmptyContent));

        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_content(response), Err(ModelError::EmptyContent));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = OpenAIClient::new(OpenAIConfig::new("", "http://localhost", "m")).unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }
}
