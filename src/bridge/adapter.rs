//! HTTP server side of the bridge.
//!
//! # Responsibilities
//! - Accept any method on any path
//! - Wrap each request as an origin-request edge event
//! - Hand the event to the configured invoker and render the result
//! - Request IDs, tracing spans, timeouts, body limits

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::bridge::invoker::Invoker;
use crate::bridge::render::{render_error, render_result};
use crate::config::EdgeConfig;
use crate::event::envelope::{CfConfig, CfEvent, EventType, WireEvent, WireRecord};
use crate::event::{self, EdgeRequest};
use crate::observability::metrics;

/// Shared state injected into the handler.
#[derive(Clone)]
struct BridgeState {
    invoker: Arc<dyn Invoker>,
    distribution_id: Arc<str>,
    max_body_bytes: usize,
}

/// Local HTTP front for one edge function.
pub struct BridgeServer {
    router: Router,
}

impl BridgeServer {
    pub fn new(config: &EdgeConfig, invoker: Arc<dyn Invoker>) -> Self {
        let state = BridgeState {
            invoker,
            distribution_id: Arc::from(config.bridge.distribution_id.as_str()),
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: BridgeState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "bridge",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )));

        Router::new()
            .route("/", any(bridge_handler))
            .route("/{*path}", any(bridge_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// The router, for driving the bridge without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Edge bridge listening");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Edge bridge draining connections");
            })
            .await?;

        tracing::info!("Edge bridge stopped");
        Ok(())
    }
}

async fn bridge_handler(State(state): State<BridgeState>, request: Request<Body>) -> Response {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            metrics::record_bridge_request("rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let event = match build_event(
        &parts.method,
        &parts.uri,
        &parts.headers,
        &bytes,
        client_ip,
        &state.distribution_id,
    ) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build edge event");
            metrics::record_bridge_request("error");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build edge event").into_response();
        }
    };

    match state.invoker.invoke(event).await {
        Ok(result) => {
            let rendered = render_result(result);
            tracing::debug!(outcome = rendered.outcome, status = %rendered.response.status(), "Bridged request");
            metrics::record_bridge_request(rendered.outcome);
            rendered.response
        }
        Err(e) => {
            tracing::error!(error = %e, "Edge function invocation failed");
            metrics::record_bridge_request("error");
            render_error(&e)
        }
    }
}

/// Wrap an HTTP request as a single-record origin-request envelope.
///
/// Header names are lower-cased as map keys and title-cased in entries;
/// a non-empty body is attached base64-encoded.
pub fn build_event(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
    client_ip: Option<IpAddr>,
    distribution_id: &str,
) -> Result<Value, serde_json::Error> {
    let mut request = EdgeRequest::new(method.clone(), uri.path())
        .with_querystring(uri.query().unwrap_or_default());

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        request.headers.append(&title_case(name.as_str()), value);
    }

    if !body.is_empty() {
        request = request.with_body(event::Body::from_bytes(body));
    }

    if let Some(ip) = client_ip {
        request
            .extra
            .insert("clientIp".to_string(), Value::String(ip.to_string()));
    }

    let envelope = WireEvent {
        records: vec![WireRecord {
            cf: CfEvent {
                config: CfConfig {
                    distribution_id: distribution_id.to_string(),
                    event_type: EventType::OriginRequest,
                    extra: Default::default(),
                },
                request: Some(request.into_wire()),
                response: None,
            },
        }],
    };

    serde_json::to_value(envelope)
}

/// `x-request-id` → `X-Request-Id`.
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
