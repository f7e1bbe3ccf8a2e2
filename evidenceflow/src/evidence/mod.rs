//! Evidence collection.
//!
//! A collector turns a URL into the raw markup the rest of the pipeline
//! works from. The archive keeps a timestamped copy of every capture so the
//! audit trail can be checked against exactly what was seen.

mod archive;
#[cfg(feature = "http")]
mod http;

pub use archive::EvidenceArchive;
#[cfg(feature = "http")]
pub use http::HttpEvidenceCollector;

use crate::errors::EvidenceError;
use async_trait::async_trait;

/// Fetches the markup for a URL.
#[async_trait]
pub trait EvidenceCollector: Send + Sync {
    /// Returns the page markup or a navigation failure.
    async fn fetch(&self, url: &str) -> Result<String, EvidenceError>;
}
