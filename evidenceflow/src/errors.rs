//! Error types for the evidenceflow pipeline.
//!
//! Errors are split along the line the pipeline cares about:
//!
//! - **Infrastructure** errors ([`EvidenceError`], [`AuditError`],
//!   [`ReportError`]) abort a run and surface as [`PipelineError`].
//! - **Domain** errors ([`ExtractionError`], [`SchemaError`], [`LlmError`])
//!   are absorbed by the extraction and validation stages and only ever
//!   flip the `validated` flag.
//! - **Startup** errors ([`ConfigError`]) stop the process before any run.

use crate::core::StageName;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration was missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Evidence could not be collected for the target URL.
    #[error("{0}")]
    Evidence(#[from] EvidenceError),

    /// An audit entry could not be written.
    #[error("{0}")]
    Audit(#[from] AuditError),

    /// The report could not be rendered or persisted.
    #[error("{0}")]
    Report(#[from] ReportError),

    /// A stage that needs captured markup ran without any.
    #[error("No HTML content available for extraction of {url} (stage: {stage})")]
    MissingEvidence {
        /// The stage that required evidence.
        stage: StageName,
        /// The URL of the run.
        url: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Creates a missing-evidence error for a stage.
    #[must_use]
    pub fn missing_evidence(stage: StageName, url: impl Into<String>) -> Self {
        Self::MissingEvidence {
            stage,
            url: url.into(),
        }
    }

    /// Returns a stable machine-readable kind for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Evidence(_) => "evidence",
            Self::Audit(_) => "audit",
            Self::Report(_) => "report",
            Self::MissingEvidence { .. } => "missing_evidence",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised while loading process configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The model API key is not set.
    #[error(
        "{var} not found in environment variables. \
         Set it in your shell or in a .env file (copy .env.example to .env and add your API key)."
    )]
    MissingApiKey {
        /// The environment variable that was consulted.
        var: String,
    },

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates a missing API key error.
    #[must_use]
    pub fn missing_api_key(var: impl Into<String>) -> Self {
        Self::MissingApiKey { var: var.into() }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Errors raised by evidence collection.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// Navigation to the URL failed (DNS, TLS, connect, timeout).
    #[error("Navigation to {url} failed: {reason}")]
    Navigation {
        /// The target URL.
        url: String,
        /// Why navigation failed.
        reason: String,
    },

    /// The response body could not be read.
    #[error("Could not read response body from {url}: {reason}")]
    Body {
        /// The target URL.
        url: String,
        /// Why reading failed.
        reason: String,
    },

    /// Captured markup could not be written to the evidence archive.
    #[error("Could not archive evidence to {}: {source}", path.display())]
    Archive {
        /// The archive file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl EvidenceError {
    /// Creates a navigation error.
    #[must_use]
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a body read error.
    #[must_use]
    pub fn body(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a language model backend.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// Network error (connection failed, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request).
    #[error("API error: {0}")]
    Api(String),

    /// The response envelope could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The model returned no text.
    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// A structural violation of the extraction schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The extracted value is not a JSON object.
    #[error("Expected a JSON object, found {found}")]
    NotAnObject {
        /// The JSON type that was found.
        found: &'static str,
    },

    /// A field holds a value of the wrong type.
    #[error("Field '{field}' must be a string or null, found {found}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// The JSON type that was found.
        found: &'static str,
    },
}

/// Domain-level extraction failures.
///
/// These never abort a run; the extractor converts them into
/// `validated = false` and lets the state machine decide what happens next.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The model call failed.
    #[error("LLM extraction error: {0}")]
    Model(#[from] LlmError),

    /// The response contained no `{ ... }` span.
    #[error("No JSON object found in model response")]
    NoJsonObject,

    /// The located span was not valid JSON.
    #[error("JSON parsing error: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The parsed object violated the schema.
    #[error("Validation error: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors raised while appending to the audit trail.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit log file could not be opened or written.
    #[error("Audit log write to {} failed: {source}", path.display())]
    Write {
        /// The audit log path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The audit event could not be serialized.
    #[error("Audit event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A sink refused the event.
    #[error("Audit sink rejected event: {0}")]
    Rejected(String),
}

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be written.
    #[error("Could not write report to {}: {source}", path.display())]
    Write {
        /// The report path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The report content could not be built.
    #[error("Report rendering failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_mentions_remediation() {
        let err = ConfigError::missing_api_key("GEMINI_API_KEY");
        let message = err.to_string();

        assert!(message.contains("GEMINI_API_KEY"));
        assert!(message.contains(".env"));
    }

    #[test]
    fn test_pipeline_error_from_evidence() {
        let err: PipelineError = EvidenceError::navigation("https://example.com", "dns error").into();

        assert_eq!(err.kind(), "evidence");
        assert!(err.to_string().contains("dns error"));
    }

    #[test]
    fn test_missing_evidence_names_stage() {
        let err = PipelineError::missing_evidence(StageName::ExtractData, "https://example.com");

        assert_eq!(err.kind(), "missing_evidence");
        assert!(err.to_string().contains("extract_data"));
    }

    #[test]
    fn test_extraction_error_from_schema() {
        let err: ExtractionError = SchemaError::InvalidField {
            field: "phone_number",
            found: "array",
        }
        .into();

        assert!(err.to_string().contains("phone_number"));
    }

    #[test]
    fn test_serde_error_converts_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PipelineError = parse_err.into();

        assert_eq!(err.kind(), "serialization");
    }
}
