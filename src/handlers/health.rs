//! Readiness and liveness routes.
//!
//! Readiness combines the edge's own status with the origin's probe result;
//! liveness answers from local state only.

use std::sync::Arc;
use axum::http::StatusCode;
use futures_util::FutureExt;
use serde_json::json;

use crate::event::{EdgeRequest, EdgeResponse, Outcome};
use crate::health::{HealthDocument, HealthProbe, HealthStatus};
use crate::routing::{HandlerFuture, RequestHandler};

/// Status the edge reports for itself. Running this code proves it.
const EDGE_STATUS: HealthStatus = HealthStatus::Ok;

/// Healthy iff the origin reported OK without error and the edge is OK.
pub fn aggregate(origin: &HealthDocument, edge: &HealthStatus) -> bool {
    origin.reports(&HealthStatus::Ok) && *edge == HealthStatus::Ok
}

/// Builds the readiness response from an origin document.
pub fn readiness_response(origin: &HealthDocument) -> EdgeResponse {
    let healthy = aggregate(origin, &EDGE_STATUS);
    let (status, overall) = if healthy {
        (StatusCode::OK, HealthStatus::Ready)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, HealthStatus::Error)
    };

    let body = json!({
        "health_status": overall.as_str(),
        "edge": { "health_status": EDGE_STATUS.as_str() },
        "origin": origin.to_value(),
    });

    EdgeResponse::json(status, &body).no_cache()
}

/// Probes the origin behind the request's host and aggregates.
#[derive(Clone)]
pub struct Readiness {
    probe: Arc<dyn HealthProbe>,
}

impl Readiness {
    pub fn new(probe: Arc<dyn HealthProbe>) -> Self {
        Self { probe }
    }
}

impl RequestHandler for Readiness {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        async move {
            let origin = match request.host() {
                Some(host) => self.probe.probe(host).await,
                None => HealthDocument::failed("no host header"),
            };

            if origin.is_failed() {
                tracing::warn!(error = ?origin.error, "Origin not ready");
            }

            Outcome::Respond(readiness_response(&origin))
        }
        .boxed()
    }
}

/// Always 200 `{"health_status": "LIVE"}`.
#[derive(Debug, Clone, Default)]
pub struct Liveness;

impl RequestHandler for Liveness {
    fn handle(&self, _request: EdgeRequest) -> HandlerFuture<'_> {
        let body = json!({ "health_status": HealthStatus::Live.as_str() });
        let response = EdgeResponse::json(StatusCode::OK, &body).no_cache();
        async move { Outcome::Respond(response) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use futures_util::future::BoxFuture;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProbe {
        document: HealthDocument,
        calls: AtomicUsize,
    }

    impl FixedProbe {
        fn new(document: HealthDocument) -> Arc<Self> {
            Arc::new(Self {
                document,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl HealthProbe for FixedProbe {
        fn probe<'a>(&'a self, _host: &'a str) -> BoxFuture<'a, HealthDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let doc = self.document.clone();
            async move { doc }.boxed()
        }
    }

    fn ready_request() -> EdgeRequest {
        EdgeRequest::new(Method::GET, "/edge/hc/ready").with_header("Host", "example.com")
    }

    async fn run(handler: &dyn RequestHandler, request: EdgeRequest) -> (StatusCode, Value) {
        let outcome = handler.handle(request).await;
        let resp = outcome.response().expect("health routes always answer").clone();
        let body = serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
        (resp.status, body)
    }

    #[tokio::test]
    async fn test_ready_when_origin_ok() {
        let probe = FixedProbe::new(
            HealthDocument::with_status(HealthStatus::Ok).with_component("database", "OK"),
        );
        let (status, body) = run(&Readiness::new(probe), ready_request()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["health_status"], "READY");
        assert_eq!(body["edge"]["health_status"], "OK");
        assert_eq!(body["origin"]["health_status"], "OK");
        assert_eq!(body["origin"]["database"], "OK");
    }

    #[tokio::test]
    async fn test_degraded_origin_is_error() {
        let probe = FixedProbe::new(
            HealthDocument::with_status(HealthStatus::Degraded).with_component("database", "ERROR"),
        );
        let (status, body) = run(&Readiness::new(probe), ready_request()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["health_status"], "ERROR");
        assert_eq!(body["origin"]["health_status"], "DEGRADED");
    }

    #[tokio::test]
    async fn test_probe_error_propagates() {
        let probe = FixedProbe::new(HealthDocument::failed("connection refused"));
        let (status, body) = run(&Readiness::new(probe), ready_request()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["origin"]["error"], "connection refused");
    }

    #[tokio::test]
    async fn test_null_error_from_origin_is_not_ready() {
        let origin: HealthDocument =
            serde_json::from_value(json!({ "health_status": "OK", "error": null })).unwrap();
        let (status, body) = run(&Readiness::new(FixedProbe::new(origin)), ready_request()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["health_status"], "ERROR");
        assert_eq!(body["origin"], json!({ "health_status": "OK", "error": null }));
    }

    #[tokio::test]
    async fn test_missing_host_skips_probe() {
        let probe = FixedProbe::new(HealthDocument::with_status(HealthStatus::Ok));
        let readiness = Readiness::new(probe.clone());
        let (status, body) = run(&readiness, EdgeRequest::new(Method::GET, "/edge/hc/ready")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["origin"]["error"], "no host header");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_liveness_is_local() {
        let (status, body) = run(&Liveness, EdgeRequest::new(Method::GET, "/edge/hc/live")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["health_status"], "LIVE");
    }
}
