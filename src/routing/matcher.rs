//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request path exactly (case-sensitive)
//! - Optionally require a specific method
//! - Detect overlapping matchers at construction time
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No wildcards in the table; `PathPrefix` is for handlers that inspect
//!   their own sub-tree
//! - No regex to guarantee O(n) matching

use axum::http::Method;

use crate::event::EdgeRequest;

/// Condition a route table entry matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatcher {
    /// Exact path, any method.
    Path(String),
    /// Exact path and method.
    PathAndMethod(String, Method),
}

impl RouteMatcher {
    pub fn path(&self) -> &str {
        match self {
            RouteMatcher::Path(p) | RouteMatcher::PathAndMethod(p, _) => p,
        }
    }

    pub fn method(&self) -> Option<&Method> {
        match self {
            RouteMatcher::Path(_) => None,
            RouteMatcher::PathAndMethod(_, m) => Some(m),
        }
    }

    /// Returns true if the request matches this condition.
    pub fn matches(&self, req: &EdgeRequest) -> bool {
        match self {
            RouteMatcher::Path(p) => req.path() == p,
            RouteMatcher::PathAndMethod(p, m) => req.path() == p && req.method == *m,
        }
    }

    /// Returns true if some request could match both conditions.
    pub fn overlaps(&self, other: &RouteMatcher) -> bool {
        if self.path() != other.path() {
            return false;
        }
        match (self.method(), other.method()) {
            (Some(a), Some(b)) => a == b,
            // A path-only entry shadows every method on that path.
            _ => true,
        }
    }
}

impl std::fmt::Display for RouteMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteMatcher::Path(p) => write!(f, "{}", p),
            RouteMatcher::PathAndMethod(p, m) => write!(f, "{} {}", m, p),
        }
    }
}

/// Matches a literal path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefix {
    prefix: String,
}

impl PathPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, req: &EdgeRequest) -> bool {
        req.path().starts_with(&self.prefix)
    }
}
