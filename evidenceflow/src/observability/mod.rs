//! Observability utilities.

mod subscriber;

pub use subscriber::{env_filter, init_tracing, LogFormat, DEFAULT_FILTER};

use crate::core::StageName;
use uuid::Uuid;

/// Creates the span every stage invocation runs inside.
#[must_use]
pub fn stage_span(run_id: Uuid, stage: StageName, retry_count: u32) -> tracing::Span {
    tracing::info_span!(
        "stage",
        run_id = %run_id,
        stage = %stage,
        retry_count = retry_count,
    )
}

/// Creates the span a whole run executes inside.
#[must_use]
pub fn run_span(run_id: Uuid, url: &str) -> tracing::Span {
    tracing::info_span!("pipeline_run", run_id = %run_id, url = %url)
}
