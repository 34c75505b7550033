//! Edge handlers.
//!
//! # Data Flow
//! ```text
//! origin-request stage:
//!     Dispatcher → auth.rs      (credential callback)
//!                → greeting.rs  (prefix greeting)
//!                → health.rs    (readiness / liveness)
//!                → root.rs      (root redirect / place ids)
//!
//! origin-response stage:
//!     cors.rs (identity-federation header injection)
//! ```
//!
//! # Design Decisions
//! - Handlers never fail; every error becomes a response
//! - Response-stage handlers are synchronous and pure

pub mod auth;
pub mod cors;
pub mod greeting;
pub mod health;
pub mod root;

use crate::event::EdgeResponse;

/// Rewrites a response on its way back from the origin.
pub trait ResponseHandler: Send + Sync {
    fn handle(&self, response: EdgeResponse) -> EdgeResponse;
}
