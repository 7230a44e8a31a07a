//! # careermate-model
//!
//! The language-model capability used by CareerMate's structured extraction.
//!
//! ## Overview
//!
//! - [`TextGenerator`] - one asynchronous `generate(request) -> text` call
//! - [`OpenAIClient`] - OpenAI-compatible chat completions (feature `openai`, on by default)
//! - [`MockGenerator`] - fixed answers for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use careermate_model::{GenerateRequest, TextGenerator};
//! use careermate_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let model = OpenAIClient::new(OpenAIConfig::from_env()?)?;
//! let request =
//!     GenerateRequest::new("You match job seekers to listings.", "Find jobs requiring: SQL.");
//! let text = model.generate(request).await?;
//! ```

pub mod error;
pub mod generator;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

pub use error::{ModelError, Result};
pub use generator::{GenerateRequest, TextGenerator};
pub use mock::MockGenerator;
#[cfg(feature = "openai")]
pub use openai::{OpenAIClient, OpenAIConfig};
