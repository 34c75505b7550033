//! Edge functions: the single composition point for route tables.
//!
//! # Data Flow
//! ```text
//! envelope (JSON)
//!     → event::decode
//!     → request stage:  Dispatcher / handler → Outcome
//!       response stage: ResponseHandler → EdgeResponse
//!     → event::encode
//!     → result (JSON)
//! ```
//!
//! # Functions
//! - `edge`:   greeting under the edge prefix, passthrough otherwise
//! - `auth`:   credential callback, greeting under the auth prefix, passthrough otherwise
//! - `cors`:   federation headers on every origin response
//! - `health`: readiness / liveness, 400 otherwise
//! - `root`:   root redirect and place ids, total over paths
//!
//! # Design Decisions
//! - The set of functions is a closed enum; tables are assembled here only
//! - Built once per process and shared behind `Arc`s

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::EdgeConfig;
use crate::event::{self, CodecError, EventType, Outcome, Payload};
use crate::handlers::auth::CredentialCallback;
use crate::handlers::cors::FederationHeaders;
use crate::handlers::greeting::PrefixGreeting;
use crate::handlers::health::{Liveness, Readiness};
use crate::handlers::root::RootRedirect;
use crate::handlers::ResponseHandler;
use crate::health::{HealthProbe, HttpsProber};
use crate::observability::metrics;
use crate::routing::{fallthrough, Dispatcher, Fallback, RouteError, RouteTable, SharedHandler};

/// Errors from building or invoking an edge function.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("route table: {0}")]
    Route(#[from] RouteError),

    #[error("failed to build probe client: {0}")]
    ProbeClient(#[from] reqwest::Error),

    #[error("function '{function}' does not handle {event_type} events")]
    StageMismatch {
        function: FunctionKind,
        event_type: EventType,
    },
}

/// The edge functions this crate can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Edge,
    Auth,
    Cors,
    Health,
    Root,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 5] = [
        FunctionKind::Edge,
        FunctionKind::Auth,
        FunctionKind::Cors,
        FunctionKind::Health,
        FunctionKind::Root,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Edge => "edge",
            FunctionKind::Auth => "auth",
            FunctionKind::Cors => "cors",
            FunctionKind::Health => "health",
            FunctionKind::Root => "root",
        }
    }

    /// Function name used by local Lambda emulators.
    pub fn default_lambda_name(&self) -> &'static str {
        match self {
            FunctionKind::Edge => "EdgeFunction",
            FunctionKind::Auth => "EdgeAuthFunction",
            FunctionKind::Cors => "EdgeCorsFunction",
            FunctionKind::Health => "EdgeHcFunction",
            FunctionKind::Root => "EdgeRootFunction",
        }
    }

    /// Stage of the lifecycle this function is attached to.
    pub fn event_type(&self) -> EventType {
        match self {
            FunctionKind::Cors => EventType::OriginResponse,
            _ => EventType::OriginRequest,
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edge function '{0}'")]
pub struct UnknownFunction(pub String);

impl FromStr for FunctionKind {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFunction(s.to_string()))
    }
}

#[derive(Clone)]
enum Stage {
    Request(SharedHandler),
    Response(Arc<dyn ResponseHandler>),
}

/// A ready-to-invoke edge function.
#[derive(Clone)]
pub struct EdgeFunction {
    kind: FunctionKind,
    stage: Stage,
}

impl std::fmt::Debug for EdgeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeFunction").field("kind", &self.kind).finish()
    }
}

impl EdgeFunction {
    /// Build `kind` from configuration, creating the HTTPS prober if needed.
    pub fn from_config(kind: FunctionKind, config: &EdgeConfig) -> Result<Self, FunctionError> {
        let probe: Arc<dyn HealthProbe> = Arc::new(HttpsProber::new(config.probe.clone())?);
        Self::build(kind, config, probe)
    }

    /// Build `kind` with an explicit health probe.
    pub fn build(
        kind: FunctionKind,
        config: &EdgeConfig,
        probe: Arc<dyn HealthProbe>,
    ) -> Result<Self, FunctionError> {
        let routes = &config.routes;

        let stage = match kind {
            FunctionKind::Edge => Stage::Request(Arc::new(PrefixGreeting::new(&routes.edge_prefix))),
            FunctionKind::Auth => {
                let table = RouteTable::builder()
                    .route_method(
                        &routes.auth_callback_path,
                        Method::POST,
                        Arc::new(CredentialCallback),
                    )
                    .build()?;
                Stage::Request(fallthrough(
                    Arc::new(Dispatcher::new(table, Fallback::Passthrough)),
                    Arc::new(PrefixGreeting::new(&routes.auth_prefix)),
                ))
            }
            FunctionKind::Cors => Stage::Response(Arc::new(FederationHeaders)),
            FunctionKind::Health => {
                let table = RouteTable::builder()
                    .route(&routes.readiness_path, Arc::new(Readiness::new(probe)))
                    .route(&routes.liveness_path, Arc::new(Liveness))
                    .build()?;
                Stage::Request(Arc::new(Dispatcher::new(table, Fallback::Reject)))
            }
            FunctionKind::Root => Stage::Request(Arc::new(RootRedirect::new(
                &routes.index_path,
                &routes.place_base,
            ))),
        };

        tracing::debug!(function = %kind, "Edge function built");
        Ok(Self { kind, stage })
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Run one event through the function and return the wire result.
    pub async fn invoke(&self, envelope: Value) -> Result<Value, FunctionError> {
        let start = Instant::now();
        let result = self.invoke_inner(envelope).await;

        let outcome = match &result {
            Ok((label, _)) => *label,
            Err(e) => {
                tracing::error!(function = %self.kind, error = %e, "Edge function failed");
                "error"
            }
        };
        metrics::record_invocation(self.kind.as_str(), outcome, start);

        result.map(|(_, value)| value)
    }

    async fn invoke_inner(&self, envelope: Value) -> Result<(&'static str, Value), FunctionError> {
        let event = event::decode(envelope)?;
        let event_type = event.event_type();

        match (&self.stage, event.payload) {
            (Stage::Request(handler), Payload::Request(request)) => {
                tracing::debug!(
                    function = %self.kind,
                    method = %request.method,
                    path = %request.path(),
                    "Handling request"
                );
                let outcome = handler.handle(request).await;
                let label = if outcome.is_forward() { "forward" } else { "respond" };
                Ok((label, event::encode(outcome)?))
            }
            (Stage::Response(handler), Payload::Response(response)) => {
                let response = handler.handle(response);
                Ok(("respond", event::encode(Outcome::Respond(response))?))
            }
            _ => Err(FunctionError::StageMismatch {
                function: self.kind,
                event_type,
            }),
        }
    }
}
