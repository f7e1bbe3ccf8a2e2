//! Schema validation and the retry decision.

use crate::core::{CompanyInfo, PipelineState, MAX_RETRIES};
use crate::pipeline::BranchDecision;
use tracing::{debug, info, warn};

/// Re-checks extracted data and decides whether a corrective pass is due.
///
/// Validation never fails a run. It only ever changes `validated` and, on a
/// structural violation, clears the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Creates a validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validates `state.extracted_data` against the schema.
    pub fn validate(&self, state: &mut PipelineState) {
        match state.extracted_data().map(CompanyInfo::from_record) {
            None => {
                debug!("No extracted data to validate");
                state.clear_validated();
            }
            Some(Ok(info)) => {
                info!(fields = info.populated_count(), "Data validation successful");
                state.mark_valid(&info);
            }
            Some(Err(err)) => {
                warn!(error = %err, "Data validation failed");
                state.mark_invalid();
            }
        }
    }

    /// Whether a corrective extraction should run.
    #[must_use]
    pub fn should_retry(&self, state: &PipelineState) -> bool {
        !state.validated() && state.retry_count() < MAX_RETRIES
    }

    /// Maps [`Validator::should_retry`] onto a branch.
    #[must_use]
    pub fn decide(&self, state: &PipelineState) -> BranchDecision {
        if self.should_retry(state) {
            BranchDecision::NeedsRetry
        } else {
            BranchDecision::Proceed
        }
    }
}
