//! Assertions over finished runs and audit trails.

use crate::audit::AuditEvent;
use crate::core::{AuditStatus, PipelineState, StageName, MAX_RETRIES};

/// Asserts the audit trail visited exactly `expected`, in order.
///
/// # Panics
///
/// Panics if the sequence differs.
pub fn assert_stage_sequence(events: &[AuditEvent], expected: &[StageName]) {
    let actual: Vec<StageName> = events.iter().map(|e| e.stage).collect();
    assert_eq!(actual, expected, "unexpected stage sequence");
}

/// Asserts every event in the trail succeeded.
///
/// # Panics
///
/// Panics on the first `error` event.
pub fn assert_all_succeeded(events: &[AuditEvent]) {
    for event in events {
        assert_eq!(
            event.status,
            AuditStatus::Success,
            "stage {} failed: {:?}",
            event.stage,
            event.error
        );
    }
}

/// Asserts the state invariants that must hold after any run.
///
/// # Panics
///
/// Panics if `retry_count` exceeds the budget or a validated state carries
/// no record.
pub fn assert_state_invariants(state: &PipelineState) {
    assert!(
        state.retry_count() <= MAX_RETRIES,
        "retry_count {} exceeds {MAX_RETRIES}",
        state.retry_count()
    );
    if state.validated() {
        assert!(
            state.company_info().is_some(),
            "validated state without a schema-valid record"
        );
    }
}

/// Asserts every event carries the same run id.
///
/// # Panics
///
/// Panics if an event has no run id or ids differ.
pub fn assert_single_run(events: &[AuditEvent]) {
    let first = events.first().and_then(|e| e.run_id);
    assert!(first.is_some(), "audit events carry no run id");
    assert!(
        events.iter().all(|e| e.run_id == first),
        "audit events span more than one run"
    );
}
