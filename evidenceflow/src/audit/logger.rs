//! The audit logger wrapping every stage transition.

use super::event::{AuditEvent, PipelineSummary};
use super::sink::{AuditSink, JsonlAuditSink};
use crate::core::{AuditStatus, PipelineState, StageName};
use crate::errors::AuditError;
use crate::utils::now_utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Records one audit event per stage attempt.
///
/// Cloning is cheap; clones share the sink. [`AuditLogger::for_run`] yields a
/// logger that stamps a run id onto every event.
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
    run_id: Option<Uuid>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}

impl AuditLogger {
    /// Creates a logger over an arbitrary sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink, run_id: None }
    }

    /// Creates a logger appending to daily JSONL files under `logs_dir`.
    pub fn jsonl(logs_dir: impl Into<PathBuf>) -> Result<Self, AuditError> {
        Ok(Self::new(Arc::new(JsonlAuditSink::new(logs_dir)?)))
    }

    /// Returns a logger sharing this sink that tags events with `run_id`.
    #[must_use]
    pub fn for_run(&self, run_id: Uuid) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            run_id: Some(run_id),
        }
    }

    /// The run id stamped on events, if any.
    #[must_use]
    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Records a stage attempt.
    ///
    /// A failed write is returned to the caller; losing an audit entry is
    /// never acceptable, so the run must abort.
    pub fn log(
        &self,
        stage: StageName,
        state: &PipelineState,
        status: AuditStatus,
        error: Option<&str>,
    ) -> Result<AuditEvent, AuditError> {
        let event = AuditEvent::capture(
            &now_utc(),
            self.run_id,
            stage,
            state,
            status,
            error.map(str::to_string),
        )?;

        if let Err(err) = self.sink.append(&event) {
            warn!(stage = %stage, error = %err, "Audit write failed");
            return Err(err);
        }

        info!(
            stage = %stage,
            status = %status,
            retry_count = event.retry_count,
            state_hash = %event.state_hash,
            "Audit log: {} - {}",
            stage,
            status
        );
        Ok(event)
    }

    /// Summarizes a run from its state.
    #[must_use]
    pub fn summary(&self, state: &PipelineState) -> PipelineSummary {
        PipelineSummary::from_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::testing::FailingAuditSink;

    #[test]
    fn test_log_appends_to_sink() {
        let sink = Arc::new(MemoryAuditSink::new());
        let logger = AuditLogger::new(sink.clone());
        let state = PipelineState::new("https://example.com");

        let event = logger
            .log(StageName::CollectEvidence, &state, AuditStatus::Success, None)
            .unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0], event);
        assert!(event.run_id.is_none());
    }

    #[test]
    fn test_log_records_error_message() {
        let sink = Arc::new(MemoryAuditSink::new());
        let logger = AuditLogger::new(sink.clone());
        let state = PipelineState::new("https://example.com");

        logger
            .log(
                StageName::CollectEvidence,
                &state,
                AuditStatus::Error,
                Some("dns lookup failed"),
            )
            .unwrap();

        let event = &sink.events()[0];
        assert_eq!(event.status, AuditStatus::Error);
        assert_eq!(event.error.as_deref(), Some("dns lookup failed"));
    }

    #[test]
    fn test_for_run_tags_events() {
        let sink = Arc::new(MemoryAuditSink::new());
        let run_id = Uuid::now_v7();
        let logger = AuditLogger::new(sink.clone()).for_run(run_id);

        logger
            .log(
                StageName::ExtractData,
                &PipelineState::new("https://example.com"),
                AuditStatus::Success,
                None,
            )
            .unwrap();

        assert_eq!(logger.run_id(), Some(run_id));
        assert_eq!(sink.events()[0].run_id, Some(run_id));
    }

    #[test]
    fn test_sink_failure_is_returned() {
        let logger = AuditLogger::new(Arc::new(FailingAuditSink::new("disk full")));
        let result = logger.log(
            StageName::ValidateData,
            &PipelineState::new("https://example.com"),
            AuditStatus::Success,
            None,
        );

        assert!(matches!(result, Err(AuditError::Rejected(_))));
    }

    #[test]
    fn test_jsonl_logger_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AuditLogger::jsonl(dir.path()).unwrap();

        let event = logger
            .log(
                StageName::GenerateReport,
                &PipelineState::new("https://example.com"),
                AuditStatus::Success,
                None,
            )
            .unwrap();

        let day = event.timestamp[..10].replace('-', "");
        let path = dir.path().join(format!("audit_{day}.jsonl"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
