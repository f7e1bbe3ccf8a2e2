//! Stage trait and the six pipeline stages.
//!
//! A stage borrows the run state mutably for the duration of one attempt.
//! On `Err` a stage must leave the state exactly as it found it; the
//! orchestrator audits that untouched state as the failure snapshot.

use crate::audit::PipelineSummary;
use crate::core::{PipelineState, StageName};
use crate::errors::PipelineError;
use crate::evidence::{EvidenceArchive, EvidenceCollector};
use crate::extraction::FieldExtractor;
use crate::report::ReportGenerator;
use crate::validation::Validator;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

/// One step of the compliance pipeline.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> StageName;

    /// Executes the stage against the run state.
    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError>;
}

/// Fetches the page and stores the markup.
pub struct CollectEvidenceStage {
    collector: Arc<dyn EvidenceCollector>,
    archive: Option<EvidenceArchive>,
}

impl CollectEvidenceStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(collector: Arc<dyn EvidenceCollector>, archive: Option<EvidenceArchive>) -> Self {
        Self { collector, archive }
    }
}

impl Debug for CollectEvidenceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectEvidenceStage")
            .field("archive", &self.archive)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for CollectEvidenceStage {
    fn name(&self) -> StageName {
        StageName::CollectEvidence
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        info!(url = %state.url(), "Collecting evidence");
        let html = self.collector.fetch(state.url()).await?;
        if let Some(archive) = &self.archive {
            archive.store(&html)?;
        }
        state.set_html(html);
        Ok(())
    }
}

/// First extraction pass.
#[derive(Debug)]
pub struct ExtractDataStage {
    extractor: FieldExtractor,
}

impl ExtractDataStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Stage for ExtractDataStage {
    fn name(&self) -> StageName {
        StageName::ExtractData
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        self.extractor.extract(state).await
    }
}

/// Schema re-validation.
#[derive(Debug, Default)]
pub struct ValidateDataStage {
    validator: Validator,
}

impl ValidateDataStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Stage for ValidateDataStage {
    fn name(&self) -> StageName {
        StageName::ValidateData
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        self.validator.validate(state);
        Ok(())
    }
}

/// The single corrective extraction pass.
#[derive(Debug)]
pub struct RetryExtractionStage {
    extractor: FieldExtractor,
}

impl RetryExtractionStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Stage for RetryExtractionStage {
    fn name(&self) -> StageName {
        StageName::RetryExtraction
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        self.extractor.extract_with_retry(state).await
    }
}

/// Renders the report and records its location.
pub struct GenerateReportStage {
    generator: Arc<dyn ReportGenerator>,
}

impl GenerateReportStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(generator: Arc<dyn ReportGenerator>) -> Self {
        Self { generator }
    }
}

impl Debug for GenerateReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateReportStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for GenerateReportStage {
    fn name(&self) -> StageName {
        StageName::GenerateReport
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let location = self.generator.render(state)?;
        state.set_report(location);
        Ok(())
    }
}

/// Emits the run summary. Does not modify the state.
#[derive(Debug, Default)]
pub struct LogCompletionStage;

#[async_trait]
impl Stage for LogCompletionStage {
    fn name(&self) -> StageName {
        StageName::LogCompletion
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let summary = PipelineSummary::from_state(state);
        info!(
            pipeline_completed = summary.pipeline_completed,
            validation_successful = summary.validation_successful,
            retry_attempts = summary.retry_attempts,
            fields_extracted = summary.fields_extracted,
            url_processed = %summary.url_processed,
            "Pipeline completed"
        );
        debug!(summary = %serde_json::to_string(&summary)?, "Pipeline summary");
        Ok(())
    }
}

/// The full set of stages, one per [`StageName`].
#[derive(Debug, Clone)]
pub struct StageSet {
    collect_evidence: Arc<dyn Stage>,
    extract_data: Arc<dyn Stage>,
    validate_data: Arc<dyn Stage>,
    retry_extraction: Arc<dyn Stage>,
    generate_report: Arc<dyn Stage>,
    log_completion: Arc<dyn Stage>,
}

impl StageSet {
    /// Assembles the standard stages from their collaborators.
    #[must_use]
    pub fn standard(
        collector: Arc<dyn EvidenceCollector>,
        archive: Option<EvidenceArchive>,
        extractor: FieldExtractor,
        report_generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            collect_evidence: Arc::new(CollectEvidenceStage::new(collector, archive)),
            extract_data: Arc::new(ExtractDataStage::new(extractor.clone())),
            validate_data: Arc::new(ValidateDataStage::default()),
            retry_extraction: Arc::new(RetryExtractionStage::new(extractor)),
            generate_report: Arc::new(GenerateReportStage::new(report_generator)),
            log_completion: Arc::new(LogCompletionStage),
        }
    }

    /// Replaces the implementation of one stage.
    ///
    /// Useful for instrumenting or faking a single step.
    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        let slot = match stage.name() {
            StageName::CollectEvidence => &mut self.collect_evidence,
            StageName::ExtractData => &mut self.extract_data,
            StageName::ValidateData => &mut self.validate_data,
            StageName::RetryExtraction => &mut self.retry_extraction,
            StageName::GenerateReport => &mut self.generate_report,
            StageName::LogCompletion => &mut self.log_completion,
        };
        *slot = stage;
        self
    }

    /// Returns the stage registered under `name`.
    #[must_use]
    pub fn get(&self, name: StageName) -> &dyn Stage {
        match name {
            StageName::CollectEvidence => self.collect_evidence.as_ref(),
            StageName::ExtractData => self.extract_data.as_ref(),
            StageName::ValidateData => self.validate_data.as_ref(),
            StageName::RetryExtraction => self.retry_extraction.as_ref(),
            StageName::GenerateReport => self.generate_report.as_ref(),
            StageName::LogCompletion => self.log_completion.as_ref(),
        }
    }
}
