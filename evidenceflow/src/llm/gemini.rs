//! REST client for the Gemini `generateContent` endpoint.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::LanguageModel;
use crate::config::{ApiKey, ModelConfig};
use crate::errors::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client for `config.model`.
    pub fn new(api_key: ApiKey, config: &ModelConfig) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sets a custom base URL (proxies, regional endpoints).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends a single-turn request and returns the decoded envelope.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let started = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, model = %self.model, "Model API request failed");
            return Err(LlmError::Api(format!("{status}: {body}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let usage = body.usage_metadata.clone().unwrap_or_default();
        debug!(
            model = %self.model,
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            finish_reason = body.finish_reason(),
            "Model response received"
        );
        Ok(body)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .generate_content(&GenerateContentRequest::prompt(prompt))
            .await?;
        response.text().ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(ApiKey::new("test-key"), &ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_uses_model() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = client().with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("test-key"));
        assert_eq!(client().model(), "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = client().with_base_url("http://127.0.0.1:1");
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Network(_)));
    }
}
