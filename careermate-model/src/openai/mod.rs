//! OpenAI-compatible chat-completions backend.
//!
//! Works with any server exposing `POST {base_url}/chat/completions` in the
//! OpenAI format (OpenAI itself, vLLM, Ollama, hosted gateways).
//!
//! # Example
//!
//! ```rust,ignore
//! use careermate_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! // Reads API_KEY, BASE_URL and MODEL_NAME.
//! let client = OpenAIClient::new(OpenAIConfig::from_env()?)?;
//!
//! let custom = OpenAIClient::new(
//!     OpenAIConfig::new("sk-...", "http://localhost:8000/v1", "llama-3.1-8b")
//!         .with_max_tokens(1024),
//! )?;
//! ```

mod client;
mod config;

pub use client::OpenAIClient;
pub use config::{DEFAULT_TEMPERATURE, OpenAIConfig};
