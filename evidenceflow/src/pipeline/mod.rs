//! Pipeline assembly and execution.
//!
//! This module provides:
//! - The transition table driving stage order and the retry branch
//! - The builder wiring collectors, models, sinks and generators
//! - The orchestrator that runs and audits every stage attempt

mod builder;
mod machine;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use machine::{edge, BranchDecision, Edge, ENTRY};
pub use orchestrator::{CompliancePipeline, FinalState};
