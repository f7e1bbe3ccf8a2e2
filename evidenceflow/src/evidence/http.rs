//! HTTP evidence collector.

use super::EvidenceCollector;
use crate::config::FetchConfig;
use crate::errors::EvidenceError;
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Instant;
use tracing::{info, warn};

/// Fetches page markup over HTTP(S) with a plain GET, following redirects.
///
/// The body is the raw server markup. No JavaScript runs, so content a page
/// builds client-side is not captured.
#[derive(Debug, Clone)]
pub struct HttpEvidenceCollector {
    client: Client,
}

impl HttpEvidenceCollector {
    /// Creates a collector from fetch settings.
    pub fn new(config: &FetchConfig) -> Result<Self, EvidenceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| EvidenceError::navigation("<client>", e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EvidenceCollector for HttpEvidenceCollector {
    async fn fetch(&self, url: &str) -> Result<String, EvidenceError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EvidenceError::navigation(url, e.to_string()))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            // Error pages are still evidence of what the site served.
            warn!(url = %url, status = %status, "Non-success status while collecting evidence");
        }

        let html = response
            .text()
            .await
            .map_err(|e| EvidenceError::body(url, e.to_string()))?;

        info!(
            url = %url,
            final_url = %final_url,
            status = status.as_u16(),
            bytes = html.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Collected evidence"
        );
        Ok(html)
    }
}
