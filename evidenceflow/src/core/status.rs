//! Stage name and audit status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stages of the compliance pipeline.
///
/// The set is closed: the pipeline topology is fixed and every stage the
/// orchestrator can run is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Fetch the rendered markup for the target URL.
    CollectEvidence,
    /// First extraction attempt from the captured markup.
    ExtractData,
    /// Structural re-validation of the extracted record.
    ValidateData,
    /// The single corrective extraction attempt.
    RetryExtraction,
    /// Render the report from whatever data is present.
    GenerateReport,
    /// Compute and emit the run summary.
    LogCompletion,
}

impl StageName {
    /// All stages in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CollectEvidence,
        Self::ExtractData,
        Self::ValidateData,
        Self::RetryExtraction,
        Self::GenerateReport,
        Self::LogCompletion,
    ];

    /// Returns the snake_case name used in logs and audit entries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectEvidence => "collect_evidence",
            Self::ExtractData => "extract_data",
            Self::ValidateData => "validate_data",
            Self::RetryExtraction => "retry_extraction",
            Self::GenerateReport => "generate_report",
            Self::LogCompletion => "log_completion",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one stage attempt as recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// The stage returned normally.
    Success,
    /// The stage returned an error that aborted the run.
    Error,
}

impl AuditStatus {
    /// Returns true if the status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}
