//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a request
//! - Apply the deployment's fallback when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) path lookup via HashMap, then a scan of that path's methods
//! - Explicit fallback rather than a silent default

use std::collections::HashMap;
use std::sync::Arc;
use axum::http::{Method, StatusCode};
use futures_util::FutureExt;
use thiserror::Error;

use crate::event::{EdgeRequest, EdgeResponse, Outcome};
use crate::routing::handler::{HandlerFuture, RequestHandler, SharedHandler};
use crate::routing::matcher::RouteMatcher;

/// Errors raised while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route '{new}' overlaps already registered route '{existing}'")]
    Conflict { existing: String, new: String },

    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),
}

struct RouteEntry {
    matcher: RouteMatcher,
    action: SharedHandler,
}

/// Immutable mapping from (path[, method]) to handlers.
pub struct RouteTable {
    routes: HashMap<String, Vec<RouteEntry>>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut matchers: Vec<String> = self
            .routes
            .values()
            .flatten()
            .map(|entry| entry.matcher.to_string())
            .collect();
        matchers.sort();
        f.debug_struct("RouteTable").field("routes", &matchers).finish()
    }
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the handler for a request.
    pub fn lookup(&self, req: &EdgeRequest) -> Option<&SharedHandler> {
        self.routes
            .get(req.path())?
            .iter()
            .find(|entry| entry.matcher.matches(req))
            .map(|entry| &entry.action)
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects registrations and rejects overlaps.
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: HashMap<String, Vec<RouteEntry>>,
    error: Option<RouteError>,
}

impl RouteTableBuilder {
    /// Register a handler for every method on `path`.
    pub fn route(self, path: impl Into<String>, action: SharedHandler) -> Self {
        self.register(RouteMatcher::Path(path.into()), action)
    }

    /// Register a handler for `method` on `path`.
    pub fn route_method(self, path: impl Into<String>, method: Method, action: SharedHandler) -> Self {
        self.register(RouteMatcher::PathAndMethod(path.into(), method), action)
    }

    fn register(mut self, matcher: RouteMatcher, action: SharedHandler) -> Self {
        // Keep the first error; later registrations are ignored.
        if self.error.is_some() {
            return self;
        }

        if !matcher.path().starts_with('/') {
            self.error = Some(RouteError::InvalidPath(matcher.path().to_string()));
            return self;
        }

        let entries = self.routes.entry(matcher.path().to_string()).or_default();
        if let Some(existing) = entries.iter().find(|e| e.matcher.overlaps(&matcher)) {
            self.error = Some(RouteError::Conflict {
                existing: existing.matcher.to_string(),
                new: matcher.to_string(),
            });
            return self;
        }

        entries.push(RouteEntry { matcher, action });
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(RouteTable {
                routes: self.routes,
            }),
        }
    }
}

/// What the dispatcher does when no route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Hand the request back unchanged so it is forwarded to the origin.
    Passthrough,
    /// Answer 400 `{"error": "not found"}`.
    Reject,
}

/// Routes requests through a table, applying a fallback on a miss.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    fallback: Fallback,
}

impl Dispatcher {
    pub fn new(table: RouteTable, fallback: Fallback) -> Self {
        Self {
            table: Arc::new(table),
            fallback,
        }
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    pub async fn dispatch(&self, request: EdgeRequest) -> Outcome {
        if let Some(action) = self.table.lookup(&request) {
            return action.handle(request).await;
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path(),
            fallback = ?self.fallback,
            "No route matched"
        );

        match self.fallback {
            Fallback::Passthrough => Outcome::Forward(request),
            Fallback::Reject => Outcome::Respond(EdgeResponse::json_error(
                StatusCode::BAD_REQUEST,
                "not found",
            )),
        }
    }
}

impl RequestHandler for Dispatcher {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        self.dispatch(request).boxed()
    }
}
