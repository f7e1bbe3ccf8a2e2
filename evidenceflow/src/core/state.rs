//! The state record threaded through every pipeline stage.

use super::schema::{populated_fields, CompanyInfo, ExtractedRecord};
use serde::Serialize;

/// Maximum number of corrective extraction attempts per run.
pub const MAX_RETRIES: u32 = 1;

/// The single mutable record owned by one pipeline run.
///
/// Fields are private so the invariants hold by construction:
///
/// - `url` is fixed at construction.
/// - `validated == true` implies `extracted_data` is a schema-valid record
///   with all five keys present.
/// - `retry_count` only ever grows, one step per corrective attempt.
///
/// The serialized form (field order as declared) is what the audit trail
/// hashes as "the full state".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    url: String,
    html: Option<String>,
    extracted_data: Option<ExtractedRecord>,
    validated: bool,
    retry_count: u32,
    report: Option<String>,
}

impl PipelineState {
    /// Creates the initial state for a run.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: None,
            extracted_data: None,
            validated: false,
            retry_count: 0,
            report: None,
        }
    }

    /// The URL this run processes.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The captured markup, if collection has run.
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// The current extracted record, if any.
    #[must_use]
    pub fn extracted_data(&self) -> Option<&ExtractedRecord> {
        self.extracted_data.as_ref()
    }

    /// Whether the current record passed schema validation.
    #[must_use]
    pub fn validated(&self) -> bool {
        self.validated
    }

    /// Number of corrective extraction attempts made so far.
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// The rendered report location, once generated.
    #[must_use]
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Typed view of the current record, when it is schema-valid.
    #[must_use]
    pub fn company_info(&self) -> Option<CompanyInfo> {
        self.extracted_data
            .as_ref()
            .and_then(|record| CompanyInfo::from_record(record).ok())
    }

    /// Number of non-empty fields in the current record.
    #[must_use]
    pub fn fields_extracted(&self) -> usize {
        self.extracted_data.as_ref().map_or(0, populated_fields)
    }

    /// Stores the captured markup.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = Some(html.into());
    }

    /// Stores the report location.
    pub fn set_report(&mut self, report: impl Into<String>) {
        self.report = Some(report.into());
    }

    /// Stores a schema-valid record and marks the state validated.
    pub fn mark_valid(&mut self, info: &CompanyInfo) {
        self.extracted_data = Some(info.to_record());
        self.validated = true;
    }

    /// Clears the record and marks the state not validated.
    pub fn mark_invalid(&mut self) {
        self.extracted_data = None;
        self.validated = false;
    }

    /// Stores a record that has not been validated yet.
    ///
    /// The state is marked not validated until the validator accepts it.
    pub fn set_unvalidated(&mut self, record: ExtractedRecord) {
        self.extracted_data = Some(record);
        self.validated = false;
    }

    /// Marks the state not validated without touching the record.
    pub(crate) fn clear_validated(&mut self) {
        self.validated = false;
    }

    /// Counts one corrective extraction attempt.
    pub(crate) fn record_retry_attempt(&mut self) {
        self.retry_count += 1;
    }

    /// Whether another corrective attempt is permitted.
    #[must_use]
    pub fn retries_remaining(&self) -> bool {
        self.retry_count < MAX_RETRIES
    }
}
