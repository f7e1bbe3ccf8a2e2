//! Test doubles for the pipeline's collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::audit::{AuditEvent, AuditSink, MemoryAuditSink};
use crate::core::PipelineState;
use crate::errors::{AuditError, EvidenceError, LlmError, ReportError};
use crate::evidence::EvidenceCollector;
use crate::llm::LanguageModel;
use crate::report::ReportGenerator;

/// A model that replays queued responses in order.
///
/// Once the script runs out every call fails with an API error, so a test
/// that makes more calls than it planned for fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Creates a model with a response script.
    #[must_use]
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a model whose responses all succeed.
    #[must_use]
    pub fn replying(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok((*r).to_string())).collect())
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns every prompt received.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the number of unused responses.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().push(prompt.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Api("response script exhausted".to_string())))
    }
}

/// A collector that serves the same markup for every URL.
#[derive(Debug)]
pub struct StaticEvidenceCollector {
    html: String,
    urls: Mutex<Vec<String>>,
}

impl StaticEvidenceCollector {
    /// Creates a collector serving `html`.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the URLs fetched so far.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl EvidenceCollector for StaticEvidenceCollector {
    async fn fetch(&self, url: &str) -> Result<String, EvidenceError> {
        self.urls.lock().push(url.to_string());
        Ok(self.html.clone())
    }
}

/// A collector whose navigation always fails.
#[derive(Debug)]
pub struct FailingEvidenceCollector {
    reason: String,
}

impl FailingEvidenceCollector {
    /// Creates a collector failing with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EvidenceCollector for FailingEvidenceCollector {
    async fn fetch(&self, url: &str) -> Result<String, EvidenceError> {
        Err(EvidenceError::navigation(url, self.reason.clone()))
    }
}

/// A report generator that keeps rendered states in memory.
#[derive(Debug, Default)]
pub struct MemoryReportGenerator {
    rendered: Mutex<Vec<PipelineState>>,
}

impl MemoryReportGenerator {
    /// Creates an empty generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the states rendered so far.
    #[must_use]
    pub fn rendered(&self) -> Vec<PipelineState> {
        self.rendered.lock().clone()
    }
}

impl ReportGenerator for MemoryReportGenerator {
    fn render(&self, state: &PipelineState) -> Result<String, ReportError> {
        let mut rendered = self.rendered.lock();
        rendered.push(state.clone());
        Ok(format!("memory://report/{}", rendered.len()))
    }
}

/// A report generator that always fails.
#[derive(Debug)]
pub struct FailingReportGenerator {
    reason: String,
}

impl FailingReportGenerator {
    /// Creates a generator failing with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ReportGenerator for FailingReportGenerator {
    fn render(&self, _state: &PipelineState) -> Result<String, ReportError> {
        Err(ReportError::Render(self.reason.clone()))
    }
}

/// An audit sink that rejects events, optionally after accepting a few.
#[derive(Debug)]
pub struct FailingAuditSink {
    reason: String,
    accept_first: usize,
    accepted: MemoryAuditSink,
}

impl FailingAuditSink {
    /// Creates a sink that rejects every event.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self::failing_after(0, reason)
    }

    /// Creates a sink that accepts `count` events, then rejects the rest.
    #[must_use]
    pub fn failing_after(count: usize, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            accept_first: count,
            accepted: MemoryAuditSink::new(),
        }
    }

    /// Returns the events accepted before failures began.
    #[must_use]
    pub fn accepted(&self) -> Vec<AuditEvent> {
        self.accepted.events()
    }
}

impl AuditSink for FailingAuditSink {
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        if self.accepted.len() < self.accept_first {
            return self.accepted.append(event);
        }
        Err(AuditError::Rejected(self.reason.clone()))
    }
}
