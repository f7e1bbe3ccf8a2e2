//! First-pass and corrective field extraction.

use super::html::{clean_html, PageHints};
use super::parse::parse_model_response;
use super::prompts::{build_extraction_prompt, build_retry_prompt, truncate_content};
use crate::core::{CompanyInfo, PipelineState, StageName};
use crate::errors::{ExtractionError, PipelineError};
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default character budget for page content in a prompt.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 50_000;

/// Turns captured markup into a [`CompanyInfo`] record via a language model.
///
/// Domain failures (model errors, unparseable output, schema violations) are
/// absorbed: they clear the record and mark the state not validated. Only a
/// missing capture is returned as an error.
#[derive(Clone)]
pub struct FieldExtractor {
    model: Arc<dyn LanguageModel>,
    max_content_chars: usize,
}

impl std::fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldExtractor")
            .field("max_content_chars", &self.max_content_chars)
            .finish_non_exhaustive()
    }
}

impl FieldExtractor {
    /// Creates an extractor with the default content budget.
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }

    /// Sets the content budget.
    #[must_use]
    pub fn with_max_content_chars(mut self, chars: usize) -> Self {
        self.max_content_chars = chars;
        self
    }

    /// The content budget.
    #[must_use]
    pub fn max_content_chars(&self) -> usize {
        self.max_content_chars
    }

    /// Runs the first extraction pass.
    pub async fn extract(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let cleaned = Self::cleaned_content(state, StageName::ExtractData)?;
        let hints = PageHints::from_text(&cleaned);
        let content = truncate_content(&cleaned, self.max_content_chars);
        debug!(
            cleaned_chars = cleaned.len(),
            emails = hints.emails.len(),
            phones = hints.phones.len(),
            "Prepared extraction prompt"
        );

        let prompt = build_extraction_prompt(&content, &hints);
        match self.query(&prompt).await {
            Ok(info) => {
                info!(fields = info.populated_count(), "Company information extracted");
                state.mark_valid(&info);
            }
            Err(err) => {
                warn!(error = %err, "Extraction failed");
                state.mark_invalid();
            }
        }
        Ok(())
    }

    /// Runs the single corrective pass.
    ///
    /// Once the retry budget is spent this is a passthrough that leaves the
    /// state, including `retry_count`, untouched. Otherwise `retry_count`
    /// grows by one whatever the outcome.
    pub async fn extract_with_retry(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        if !state.retries_remaining() {
            info!(retry_count = state.retry_count(), "Maximum retry attempts reached");
            return Ok(());
        }

        let cleaned = Self::cleaned_content(state, StageName::RetryExtraction)?;
        let content = truncate_content(&cleaned, self.max_content_chars);
        info!(attempt = state.retry_count() + 1, "Retrying extraction");

        let prompt = build_retry_prompt(&content);
        match self.query(&prompt).await {
            Ok(info) => {
                info!(fields = info.populated_count(), "Retry extraction successful");
                state.mark_valid(&info);
            }
            Err(err) => {
                warn!(error = %err, "Retry extraction failed");
                state.mark_invalid();
            }
        }
        state.record_retry_attempt();
        Ok(())
    }

    fn cleaned_content(state: &PipelineState, stage: StageName) -> Result<String, PipelineError> {
        state
            .html()
            .map(clean_html)
            .ok_or_else(|| PipelineError::missing_evidence(stage, state.url()))
    }

    async fn query(&self, prompt: &str) -> Result<CompanyInfo, ExtractionError> {
        let response = self.model.generate(prompt).await?;
        parse_model_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LlmError;
    use crate::llm::MockLanguageModel;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "<html><body><h1>Acme GmbH</h1><footer>info@acme.de</footer></body></html>";

    fn state_with_html() -> PipelineState {
        let mut state = PipelineState::new("https://acme.de");
        state.set_html(PAGE);
        state
    }

    fn extractor(model: MockLanguageModel) -> FieldExtractor {
        FieldExtractor::new(Arc::new(model))
    }

    #[tokio::test]
    async fn test_extract_success_marks_valid() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .withf(|prompt| prompt.contains("Acme GmbH") && prompt.contains("info@acme.de"))
            .times(1)
            .returning(|_| Ok(r#"{"company_name": "Acme GmbH", "contact_email": "info@acme.de"}"#.to_string()));

        let mut state = state_with_html();
        tokio_test::assert_ok!(extractor(model).extract(&mut state).await);

        assert!(state.validated());
        assert_eq!(state.fields_extracted(), 2);
        assert_eq!(state.retry_count(), 0);
        assert_eq!(state.extracted_data().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_extract_model_error_marks_invalid() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .returning(|_| Err(LlmError::Api("429: quota".to_string())));

        let mut state = state_with_html();
        extractor(model).extract(&mut state).await.unwrap();

        assert!(!state.validated());
        assert!(state.extracted_data().is_none());
    }

    #[tokio::test]
    async fn test_extract_gibberish_marks_invalid() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .returning(|_| Ok("Sorry, I cannot help with that.".to_string()));

        let mut state = state_with_html();
        extractor(model).extract(&mut state).await.unwrap();

        assert!(!state.validated());
        assert!(state.extracted_data().is_none());
    }

    #[tokio::test]
    async fn test_extract_without_html_is_fatal_and_leaves_state() {
        let mut model = MockLanguageModel::new();
        model.expect_generate().never();

        let mut state = PipelineState::new("https://acme.de");
        let before = state.clone();
        let err = extractor(model).extract(&mut state).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::MissingEvidence {
                stage: StageName::ExtractData,
                ..
            }
        ));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_extract_truncates_content() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .withf(|prompt| prompt.contains("aaaaaaaaaa...") && !prompt.contains("aaaaaaaaaaa"))
            .returning(|_| Ok("{}".to_string()));

        let mut state = PipelineState::new("https://acme.de");
        state.set_html(format!("<p>{}</p>", "a".repeat(100)));
        extractor(model)
            .with_max_content_chars(10)
            .extract(&mut state)
            .await
            .unwrap();

        assert!(state.validated());
        assert_eq!(state.fields_extracted(), 0);
    }

    #[tokio::test]
    async fn test_retry_success_increments_count() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .withf(|prompt| prompt.contains("previous extraction attempt failed"))
            .times(1)
            .returning(|_| Ok(r#"{"company_name": "Acme GmbH"}"#.to_string()));

        let mut state = state_with_html();
        state.mark_invalid();
        extractor(model).extract_with_retry(&mut state).await.unwrap();

        assert!(state.validated());
        assert_eq!(state.retry_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_failure_still_increments_count() {
        let mut model = MockLanguageModel::new();
        model
            .expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::Network("timeout".to_string())));

        let mut state = state_with_html();
        extractor(model).extract_with_retry(&mut state).await.unwrap();

        assert!(!state.validated());
        assert!(state.extracted_data().is_none());
        assert_eq!(state.retry_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_is_passthrough_when_budget_spent() {
        let mut model = MockLanguageModel::new();
        model.expect_generate().never();

        let mut state = state_with_html();
        state.record_retry_attempt();
        let before = state.clone();

        extractor(model).extract_with_retry(&mut state).await.unwrap();

        assert_eq!(state, before);
        assert_eq!(state.retry_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_without_html_does_not_count_attempt() {
        let mut model = MockLanguageModel::new();
        model.expect_generate().never();

        let mut state = PipelineState::new("https://acme.de");
        let err = extractor(model).extract_with_retry(&mut state).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::MissingEvidence {
                stage: StageName::RetryExtraction,
                ..
            }
        ));
        assert_eq!(state.retry_count(), 0);
    }
}
