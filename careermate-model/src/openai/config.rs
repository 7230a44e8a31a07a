//! Configuration for the OpenAI-compatible client.

use std::time::Duration;

use crate::error::{ModelError, Result};

/// Sampling temperature used unless overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Connection settings and sampling parameters for [`OpenAIClient`](super::OpenAIClient).
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Transport-level deadline applied to every request.
    pub timeout: Option<Duration>,
}

impl OpenAIConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: None,
        }
    }

    /// Build from the `API_KEY`, `BASE_URL` and `MODEL_NAME` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] naming every variable that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let (api_key, base_url, model) = (read("API_KEY"), read("BASE_URL"), read("MODEL_NAME"));

        match (api_key, base_url, model) {
            (Some(api_key), Some(base_url), Some(model)) => Ok(Self::new(api_key, base_url, model)),
            (api_key, base_url, model) => {
                let missing: Vec<&str> = [
                    ("API_KEY", api_key.is_none()),
                    ("BASE_URL", base_url.is_none()),
                    ("MODEL_NAME", model.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ModelError::Config(format!(
                    "missing environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ModelError::Config("api_key must not be empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(ModelError::Config("base_url must not be empty".to_string()));
        }
        if self.model.is_empty() {
            return Err(ModelError::Config("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ModelError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn reads_all_three_variables() {
        let vars = env(&[
            ("API_KEY", "secret"),
            ("BASE_URL", "https://llm.example.com/v1/"),
            ("MODEL_NAME", "gpt-4o-mini"),
        ]);
        let config = OpenAIConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.base_url, "https://llm.example.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn names_every_missing_variable() {
        let vars = env(&[("API_KEY", "secret"), ("MODEL_NAME", "  ")]);
        let err = OpenAIConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(
            err,
            ModelError::Config("missing environment variables: BASE_URL, MODEL_NAME".to_string())
        );
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let config = OpenAIConfig::new("k", "http://localhost", "m").with_temperature(3.5);
        assert!(matches!(config.validate(), Err(ModelError::Config(_))));
    }
}
