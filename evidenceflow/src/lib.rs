//! # Evidenceflow
//!
//! A compliance evidence pipeline: capture a company website, extract
//! structured contact data with a generative model, validate it, and leave an
//! append-only, hash-stamped audit trail of every step.
//!
//! Evidenceflow provides:
//!
//! - **A fixed state machine**: collect, extract, validate, at most one
//!   corrective retry, report, complete
//! - **Tolerant extraction**: prose-wrapped model output is parsed; bad output
//!   only flips the `validated` flag
//! - **Audit trail**: one JSONL event per stage attempt with SHA-256 digests
//!   of the state and of the extracted record
//! - **Pluggable seams**: evidence collectors, language models, report
//!   generators and audit sinks are traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evidenceflow::prelude::*;
//!
//! let config = PipelineConfig::from_env()?;
//! let pipeline = PipelineBuilder::from_config(&config)?.build()?;
//!
//! let result = pipeline.run("https://example.com").await?;
//! println!("{}", format_console_summary(&result.state));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod audit;
pub mod config;
pub mod core;
pub mod errors;
pub mod evidence;
pub mod extraction;
pub mod llm;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod testing;
pub mod utils;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::audit::{
        AuditEvent, AuditLogger, AuditSink, JsonlAuditSink, MemoryAuditSink, PipelineSummary,
    };
    pub use crate::config::{FetchConfig, ModelConfig, PipelineConfig};
    pub use crate::core::{AuditStatus, CompanyInfo, PipelineState, StageName, MAX_RETRIES};
    pub use crate::errors::{
        AuditError, ConfigError, EvidenceError, ExtractionError, LlmError, PipelineError,
        ReportError, SchemaError,
    };
    pub use crate::evidence::{EvidenceArchive, EvidenceCollector};
    #[cfg(feature = "http")]
    pub use crate::evidence::HttpEvidenceCollector;
    pub use crate::extraction::FieldExtractor;
    #[cfg(feature = "http")]
    pub use crate::llm::GeminiClient;
    pub use crate::llm::LanguageModel;
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::{BranchDecision, CompliancePipeline, FinalState, PipelineBuilder};
    pub use crate::report::{format_console_summary, MarkdownReportGenerator, ReportGenerator};
    pub use crate::stages::Stage;
    pub use crate::utils::{hash_text, normalize_url};
    pub use crate::validation::Validator;
}
