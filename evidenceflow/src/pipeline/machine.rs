//! The pipeline topology as an explicit transition table.
//!
//! ```text
//! collect_evidence -> extract_data -> validate_data --proceed--> generate_report -> log_completion -> END
//!                                         ^    |
//!                                         |  needs_retry
//!                                         |    v
//!                                     retry_extraction
//! ```

use crate::core::StageName;

/// The stage every run starts with.
pub const ENTRY: StageName = StageName::CollectEvidence;

/// Outcome of the post-validation branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDecision {
    /// Validation failed and the retry budget is not spent.
    NeedsRetry,
    /// Continue to reporting.
    Proceed,
}

/// What follows a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Unconditional transition.
    To(StageName),
    /// Conditional transition resolved by a [`BranchDecision`].
    Branch {
        /// Next stage on [`BranchDecision::NeedsRetry`].
        retry: StageName,
        /// Next stage on [`BranchDecision::Proceed`].
        proceed: StageName,
    },
    /// The run is complete.
    End,
}

impl Edge {
    /// Resolves the edge to the next stage, if any.
    ///
    /// `decision` is only consulted for [`Edge::Branch`].
    #[must_use]
    pub fn next(self, decision: impl FnOnce() -> BranchDecision) -> Option<StageName> {
        match self {
            Self::To(next) => Some(next),
            Self::Branch { retry, proceed } => match decision() {
                BranchDecision::NeedsRetry => Some(retry),
                BranchDecision::Proceed => Some(proceed),
            },
            Self::End => None,
        }
    }
}

/// The outgoing edge of a stage.
#[must_use]
pub const fn edge(stage: StageName) -> Edge {
    match stage {
        StageName::CollectEvidence => Edge::To(StageName::ExtractData),
        StageName::ExtractData | StageName::RetryExtraction => Edge::To(StageName::ValidateData),
        StageName::ValidateData => Edge::Branch {
            retry: StageName::RetryExtraction,
            proceed: StageName::GenerateReport,
        },
        StageName::GenerateReport => Edge::To(StageName::LogCompletion),
        StageName::LogCompletion => Edge::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(decisions: &[BranchDecision]) -> Vec<StageName> {
        let mut decisions = decisions.iter().copied();
        let mut path = vec![ENTRY];
        let mut current = ENTRY;
        while let Some(next) = edge(current).next(|| decisions.next().unwrap_or(BranchDecision::Proceed)) {
            path.push(next);
            current = next;
        }
        path
    }

    #[test]
    fn test_happy_path() {
        assert_eq!(
            walk(&[BranchDecision::Proceed]),
            vec![
                StageName::CollectEvidence,
                StageName::ExtractData,
                StageName::ValidateData,
                StageName::GenerateReport,
                StageName::LogCompletion,
            ]
        );
    }

    #[test]
    fn test_retry_path() {
        assert_eq!(
            walk(&[BranchDecision::NeedsRetry, BranchDecision::Proceed]),
            vec![
                StageName::CollectEvidence,
                StageName::ExtractData,
                StageName::ValidateData,
                StageName::RetryExtraction,
                StageName::ValidateData,
                StageName::GenerateReport,
                StageName::LogCompletion,
            ]
        );
    }

    #[test]
    fn test_only_validate_branches() {
        for stage in StageName::ALL {
            let is_branch = matches!(edge(stage), Edge::Branch { .. });
            assert_eq!(is_branch, stage == StageName::ValidateData);
        }
    }

    #[test]
    fn test_decision_not_consulted_for_unconditional_edges() {
        let next = edge(StageName::CollectEvidence).next(|| panic!("should not be asked"));
        assert_eq!(next, Some(StageName::ExtractData));
        assert_eq!(edge(StageName::LogCompletion).next(|| BranchDecision::Proceed), None);
    }
}
