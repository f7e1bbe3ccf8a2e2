//! Testing utilities for evidenceflow pipelines.
//!
//! This module provides:
//! - Scripted and failing doubles for every collaborator seam
//! - Canned pages and model responses
//! - Assertions over audit trails and final states

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_all_succeeded, assert_single_run, assert_stage_sequence, assert_state_invariants,
};
pub use fixtures::{
    ACME_HTML, ACME_RESPONSE, GERMAN_HTML, GIBBERISH_RESPONSE, PROSE_RESPONSE, WRONG_TYPE_RESPONSE,
};
pub use mocks::{
    FailingAuditSink, FailingEvidenceCollector, FailingReportGenerator, MemoryReportGenerator,
    ScriptedModel, StaticEvidenceCollector,
};
