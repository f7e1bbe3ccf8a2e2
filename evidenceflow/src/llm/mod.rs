//! Generative model backends.
//!
//! The pipeline only needs one capability from a model: turn a prompt into
//! text. [`LanguageModel`] is that seam; [`GeminiClient`] is the production
//! implementation and the `testing` module provides scripted doubles.

#[cfg(feature = "http")]
mod gemini;
mod types;

#[cfg(feature = "http")]
pub use gemini::GeminiClient;
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, UsageMetadata};

use crate::errors::LlmError;
use async_trait::async_trait;

/// A text-in, text-out generative model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
