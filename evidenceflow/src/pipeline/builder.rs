//! Pipeline builder.

use super::orchestrator::CompliancePipeline;
use crate::audit::{AuditLogger, AuditSink, JsonlAuditSink};
use crate::errors::{ConfigError, PipelineError};
use crate::evidence::{EvidenceArchive, EvidenceCollector};
use crate::extraction::{FieldExtractor, DEFAULT_MAX_CONTENT_CHARS};
use crate::llm::LanguageModel;
use crate::report::{MarkdownReportGenerator, ReportGenerator};
use crate::stages::{Stage, StageSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "http")]
use crate::config::PipelineConfig;

/// Default directory for audit logs when no sink is given.
const DEFAULT_LOGS_DIR: &str = "logs";
/// Default directory for reports when no generator is given.
const DEFAULT_REPORTS_DIR: &str = "reports";

/// Assembles a [`CompliancePipeline`] from its collaborators.
///
/// A collector and a model are required. The audit sink defaults to daily
/// JSONL files under `logs/`, the report generator to Markdown files under
/// `reports/`, and evidence archiving is off unless an archive is set.
#[derive(Default)]
pub struct PipelineBuilder {
    collector: Option<Arc<dyn EvidenceCollector>>,
    model: Option<Arc<dyn LanguageModel>>,
    report_generator: Option<Arc<dyn ReportGenerator>>,
    audit_sink: Option<Arc<dyn AuditSink>>,
    archive: Option<EvidenceArchive>,
    max_content_chars: Option<usize>,
    overrides: Vec<Arc<dyn Stage>>,
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("has_collector", &self.collector.is_some())
            .field("has_model", &self.model.is_some())
            .field("archive", &self.archive)
            .field("max_content_chars", &self.max_content_chars)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the production wiring from configuration: HTTP collector,
    /// Gemini client, JSONL audit sink and Markdown reports.
    #[cfg(feature = "http")]
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        use crate::evidence::HttpEvidenceCollector;
        use crate::llm::GeminiClient;

        config.validate()?;
        let api_key = config.require_api_key()?.clone();
        let model = GeminiClient::new(api_key, &config.model)
            .map_err(|e| ConfigError::invalid(format!("could not create model client: {e}")))?;
        let collector = HttpEvidenceCollector::new(&config.fetch)?;
        let sink = JsonlAuditSink::new(&config.logs_dir)?;

        let mut builder = Self::new()
            .with_collector(Arc::new(collector))
            .with_model(Arc::new(model))
            .with_report_generator(Arc::new(MarkdownReportGenerator::new(&config.reports_dir)))
            .with_audit_sink(Arc::new(sink))
            .with_max_content_chars(config.max_content_chars);
        if let Some(dir) = &config.evidence_dir {
            builder = builder.with_evidence_archive(EvidenceArchive::new(dir));
        }
        Ok(builder)
    }

    /// Sets the evidence collector.
    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn EvidenceCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Sets the language model.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the report generator.
    #[must_use]
    pub fn with_report_generator(mut self, generator: Arc<dyn ReportGenerator>) -> Self {
        self.report_generator = Some(generator);
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Enables raw evidence archiving.
    #[must_use]
    pub fn with_evidence_archive(mut self, archive: EvidenceArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Sets the prompt content budget.
    #[must_use]
    pub fn with_max_content_chars(mut self, chars: usize) -> Self {
        self.max_content_chars = Some(chars);
        self
    }

    /// Replaces one standard stage with a custom implementation.
    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.overrides.push(stage);
        self
    }

    /// Builds the pipeline.
    pub fn build(self) -> Result<CompliancePipeline, PipelineError> {
        let collector = self
            .collector
            .ok_or_else(|| ConfigError::invalid("no evidence collector configured"))?;
        let model = self
            .model
            .ok_or_else(|| ConfigError::invalid("no language model configured"))?;
        let max_content_chars = self.max_content_chars.unwrap_or(DEFAULT_MAX_CONTENT_CHARS);
        if max_content_chars == 0 {
            return Err(ConfigError::invalid("max_content_chars must be > 0").into());
        }

        let report_generator: Arc<dyn ReportGenerator> = match self.report_generator {
            Some(generator) => generator,
            None => Arc::new(MarkdownReportGenerator::new(DEFAULT_REPORTS_DIR)),
        };
        let audit_sink: Arc<dyn AuditSink> = match self.audit_sink {
            Some(sink) => sink,
            None => Arc::new(JsonlAuditSink::new(PathBuf::from(DEFAULT_LOGS_DIR))?),
        };

        let extractor = FieldExtractor::new(model).with_max_content_chars(max_content_chars);
        let mut stages = StageSet::standard(collector, self.archive, extractor, report_generator);
        for stage in self.overrides {
            debug!(stage = %stage.name(), "Overriding stage");
            stages = stages.with_stage(stage);
        }

        Ok(CompliancePipeline::new(stages, AuditLogger::new(audit_sink)))
    }
}
