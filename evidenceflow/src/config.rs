//! Configuration types for the pipeline and its collaborators.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the model API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "EVIDENCEFLOW_MODEL";
/// Environment variable overriding the audit log directory.
pub const LOGS_DIR_VAR: &str = "EVIDENCEFLOW_LOGS_DIR";
/// Environment variable overriding the report directory.
pub const REPORTS_DIR_VAR: &str = "EVIDENCEFLOW_REPORTS_DIR";
/// Environment variable overriding the evidence archive directory.
pub const EVIDENCE_DIR_VAR: &str = "EVIDENCEFLOW_EVIDENCE_DIR";

/// A secret API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Exposes the key for request signing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Configuration for HTTP evidence fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("evidenceflow/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Configuration for the generative model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the REST API.
    #[serde(default = "default_model_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: f64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_model_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model_timeout() -> f64 {
    120.0
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_model_base_url(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

impl ModelConfig {
    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model API key.
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Evidence fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Directory for daily audit logs.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    /// Directory for rendered reports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    /// Directory for raw evidence snapshots; `None` disables archiving.
    #[serde(default = "default_evidence_dir")]
    pub evidence_dir: Option<PathBuf>,
    /// Character budget for page content embedded in prompts.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

#[allow(clippy::unnecessary_wraps)]
fn default_evidence_dir() -> Option<PathBuf> {
    Some(PathBuf::from("evidence"))
}

fn default_max_content_chars() -> usize {
    50_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelConfig::default(),
            fetch: FetchConfig::default(),
            logs_dir: default_logs_dir(),
            reports_dir: default_reports_dir(),
            evidence_dir: default_evidence_dir(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with defaults and no API key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| ConfigError::missing_api_key(API_KEY_VAR))?;
        let mut config = Self::default().with_api_key(api_key.trim());

        if let Some(model) = non_empty(MODEL_VAR) {
            config.model.model = model;
        }
        if let Some(dir) = non_empty(LOGS_DIR_VAR) {
            config.logs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(REPORTS_DIR_VAR) {
            config.reports_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(EVIDENCE_DIR_VAR) {
            config.evidence_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model.model = model.into();
        self
    }

    /// Sets the audit log directory.
    #[must_use]
    pub fn with_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = dir.into();
        self
    }

    /// Sets the report directory.
    #[must_use]
    pub fn with_reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }

    /// Sets the evidence archive directory.
    #[must_use]
    pub fn with_evidence_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.evidence_dir = Some(dir.into());
        self
    }

    /// Disables evidence archiving.
    #[must_use]
    pub fn without_evidence_archive(mut self) -> Self {
        self.evidence_dir = None;
        self
    }

    /// Sets the prompt content budget.
    #[must_use]
    pub fn with_max_content_chars(mut self, chars: usize) -> Self {
        self.max_content_chars = chars;
        self
    }

    /// Returns the API key or a startup error.
    pub fn require_api_key(&self) -> Result<&ApiKey, ConfigError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ConfigError::missing_api_key(API_KEY_VAR))
    }

    /// Validates value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_content_chars == 0 {
            return Err(ConfigError::invalid("max_content_chars must be > 0"));
        }
        if self.fetch.timeout_seconds <= 0.0 {
            return Err(ConfigError::invalid("fetch.timeout_seconds must be positive"));
        }
        if self.model.timeout_seconds <= 0.0 {
            return Err(ConfigError::invalid("model.timeout_seconds must be positive"));
        }
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::invalid("model name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.max_content_chars, 50_000);
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.evidence_dir, Some(PathBuf::from("evidence")));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = PipelineConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));

        let err = PipelineConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = PipelineConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "gemini-2.5-pro"),
            (LOGS_DIR_VAR, "/var/log/evidence"),
        ]))
        .unwrap();

        assert_eq!(config.require_api_key().unwrap().expose(), "secret");
        assert_eq!(config.model.model, "gemini-2.5-pro");
        assert_eq!(config.logs_dir, PathBuf::from("/var/log/evidence"));
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let config = PipelineConfig::new().with_api_key("super-secret");
        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("ApiKey(***)"));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = PipelineConfig::new().with_max_content_chars(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_model("m")
            .with_reports_dir("out")
            .without_evidence_archive();

        assert_eq!(config.model.model, "m");
        assert_eq!(config.reports_dir, PathBuf::from("out"));
        assert!(config.evidence_dir.is_none());
    }

    #[test]
    fn test_fetch_config_builder() {
        let config = FetchConfig::new().with_timeout(5.0).with_user_agent("agent");

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent, "agent");
    }
}
