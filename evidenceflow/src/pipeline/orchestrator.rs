//! Runs the state machine and audits every stage attempt.

use super::machine::{edge, BranchDecision, ENTRY};
use crate::audit::{AuditLogger, PipelineSummary};
use crate::core::{AuditStatus, PipelineState, StageName};
use crate::errors::PipelineError;
use crate::observability::{run_span, stage_span};
use crate::stages::StageSet;
use crate::validation::Validator;
use serde::Serialize;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// The outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct FinalState {
    /// Identifier stamped on every audit event of the run.
    pub run_id: Uuid,
    /// The state after `log_completion`.
    pub state: PipelineState,
    /// Summary derived from the final state.
    pub summary: PipelineSummary,
    /// Stage invocations, equal to the audit events written.
    pub audit_events: usize,
}

/// The compliance evidence pipeline.
///
/// Holds no per-run state; one instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct CompliancePipeline {
    stages: StageSet,
    validator: Validator,
    audit: AuditLogger,
}

impl CompliancePipeline {
    pub(crate) fn new(stages: StageSet, audit: AuditLogger) -> Self {
        Self {
            stages,
            validator: Validator::new(),
            audit,
        }
    }

    /// Processes one URL end to end.
    ///
    /// Domain failures (unparseable model output, schema violations) never
    /// surface here; they only affect `validated` and trigger the single
    /// retry. Infrastructure failures abort the run after an `error` audit
    /// event for the failing stage.
    pub async fn run(&self, url: &str) -> Result<FinalState, PipelineError> {
        let run_id = Uuid::now_v7();
        self.run_inner(run_id, url)
            .instrument(run_span(run_id, url))
            .await
    }

    async fn run_inner(&self, run_id: Uuid, url: &str) -> Result<FinalState, PipelineError> {
        info!("Starting compliance pipeline");
        let audit = self.audit.for_run(run_id);
        let mut state = PipelineState::new(url);
        let mut audit_events = 0;
        let mut retry_ran = false;
        let mut current = Some(ENTRY);

        while let Some(name) = current {
            let span = stage_span(run_id, name, state.retry_count());
            let result = self
                .stages
                .get(name)
                .execute(&mut state)
                .instrument(span)
                .await;

            match result {
                Ok(()) => {
                    audit.log(name, &state, AuditStatus::Success, None)?;
                    audit_events += 1;
                }
                Err(err) => {
                    let message = err.to_string();
                    error!(stage = %name, kind = err.kind(), error = %message, "Stage failed");
                    if let Err(audit_err) = audit.log(name, &state, AuditStatus::Error, Some(&message)) {
                        error!(stage = %name, error = %message, "Stage failure could not be audited");
                        return Err(audit_err.into());
                    }
                    return Err(err);
                }
            }

            if name == StageName::RetryExtraction {
                retry_ran = true;
            }
            current = edge(name).next(|| self.branch(&state, retry_ran));
        }

        let summary = audit.summary(&state);
        info!(
            validated = summary.validation_successful,
            retry_attempts = summary.retry_attempts,
            audit_events,
            "Pipeline finished"
        );
        Ok(FinalState {
            run_id,
            state,
            summary,
            audit_events,
        })
    }

    fn branch(&self, state: &PipelineState, retry_ran: bool) -> BranchDecision {
        let decision = self.validator.decide(state);
        if retry_ran && decision == BranchDecision::NeedsRetry {
            // At most one corrective pass per run, whatever the retry stage
            // did to the count.
            warn!(retry_count = state.retry_count(), "Retry already ran; proceeding to report");
            return BranchDecision::Proceed;
        }
        decision
    }
}
