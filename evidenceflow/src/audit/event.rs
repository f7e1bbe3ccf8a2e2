//! Audit event and run summary records.

use crate::core::{AuditStatus, PipelineState, StageName};
use crate::utils::{hash_text, iso_format, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable, hash-stamped record of a stage attempt.
///
/// Serialized as a single JSON line in the daily audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event was recorded (ISO 8601, UTC).
    pub timestamp: String,
    /// The run this event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    /// The stage that ran.
    pub stage: StageName,
    /// Whether the stage succeeded.
    pub status: AuditStatus,
    /// Retry count at the time of the event.
    pub retry_count: u32,
    /// Truncated digest of the full state.
    pub state_hash: String,
    /// Truncated digest of the extracted record.
    pub data_hash: String,
    /// The processed URL.
    pub url: String,
    /// Validated flag at the time of the event.
    pub validated: bool,
    /// Error message for failed stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    /// Builds an event from a state snapshot.
    pub fn capture(
        at: &Timestamp,
        run_id: Option<Uuid>,
        stage: StageName,
        state: &PipelineState,
        status: AuditStatus,
        error: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        let (state_hash, data_hash) = state_digests(state)?;
        Ok(Self {
            timestamp: iso_format(at),
            run_id,
            stage,
            status,
            retry_count: state.retry_count(),
            state_hash,
            data_hash,
            url: state.url().to_string(),
            validated: state.validated(),
            error,
        })
    }

    /// Serializes to one JSON line without a trailing newline.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Computes `(state_hash, data_hash)` for a state.
///
/// The data digest covers the JSON text of `extracted_data`, or the empty
/// string when there is none.
pub fn state_digests(state: &PipelineState) -> Result<(String, String), serde_json::Error> {
    let state_text = serde_json::to_string(state)?;
    let data_text = match state.extracted_data() {
        Some(record) => serde_json::to_string(record)?,
        None => String::new(),
    };
    Ok((hash_text(&state_text), hash_text(&data_text)))
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Whether a report was produced.
    pub pipeline_completed: bool,
    /// Final validated flag.
    pub validation_successful: bool,
    /// Corrective attempts made.
    pub retry_attempts: u32,
    /// Number of non-empty extracted fields.
    pub fields_extracted: usize,
    /// The processed URL.
    pub url_processed: String,
}

impl PipelineSummary {
    /// Derives the summary from a state.
    #[must_use]
    pub fn from_state(state: &PipelineState) -> Self {
        Self {
            pipeline_completed: state.report().is_some(),
            validation_successful: state.validated(),
            retry_attempts: state.retry_count(),
            fields_extracted: state.fields_extracted(),
            url_processed: state.url().to_string(),
        }
    }
}
