//! Origin health probing with host fallback.
//!
//! # Responsibilities
//! - Build the ordered candidate list from the request's host header
//! - Probe each candidate over HTTPS with its own timeout
//! - Return the first healthy document, or the last error

use std::future::Future;
use std::time::Duration;
use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

use crate::config::ProbeConfig;
use crate::health::document::HealthDocument;
use crate::observability::metrics;

/// Why a single candidate failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("origin returned {0}")]
    Status(u16),

    #[error("invalid health document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no probe candidates")]
    NoCandidates,
}

/// Source of origin health documents.
pub trait HealthProbe: Send + Sync {
    /// Probe the origin addressed by `host`. Never fails: failures are
    /// reported through the document's `error` field.
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, HealthDocument>;
}

/// Ordered probe targets: the literal host, then the fallback service name
/// carrying the same port when the host had one.
pub fn candidate_targets(host: &str, fallback_host: &str) -> Vec<String> {
    let port = host.rsplit_once(':').map(|(_, port)| port);

    let fallback = match port {
        Some(port) if !port.is_empty() => format!("{}:{}", fallback_host, port),
        _ => fallback_host.to_string(),
    };

    let mut targets = vec![host.to_string()];
    if fallback != host {
        targets.push(fallback);
    }
    targets
}

/// Try `attempt` on each candidate in order; the first success wins.
///
/// When every candidate fails, the returned document carries the last error.
pub async fn probe_candidates<F, Fut>(candidates: &[String], attempt: F) -> HealthDocument
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<HealthDocument, ProbeError>>,
{
    let mut last_error = ProbeError::NoCandidates;

    for target in candidates {
        match attempt(target.clone()).await {
            Ok(document) => {
                tracing::debug!(target = %target, "Origin health probe succeeded");
                metrics::record_probe_attempt(true);
                return document;
            }
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "Origin health probe failed");
                metrics::record_probe_attempt(false);
                last_error = e;
            }
        }
    }

    HealthDocument::failed(last_error.to_string())
}

/// Probes `https://<candidate><health_path>` with certificate checks disabled.
#[derive(Debug, Clone)]
pub struct HttpsProber {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl HttpsProber {
    pub fn new(config: ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .danger_accept_invalid_hostnames(!config.verify_tls)
            .user_agent(concat!("edge-gateway-health-check/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch(&self, target: String, host: &str) -> Result<HealthDocument, ProbeError> {
        let url = format!("https://{}{}", target, self.config.health_path);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::HOST, host)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ProbeError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Checks the origin behind `host`, trying the fallback on failure.
    ///
    /// Every attempt sends `Host: <host>`, including the fallback.
    pub async fn check(&self, host: &str) -> HealthDocument {
        let candidates = candidate_targets(host, &self.config.fallback_host);
        probe_candidates(&candidates, |target| self.fetch(target, host)).await
    }
}

impl HealthProbe for HttpsProber {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, HealthDocument> {
        self.check(host).boxed()
    }
}
