//! Local HTTP bridge.
//!
//! # Data Flow
//! ```text
//! HTTP request (any method, any path)
//!     → adapter.rs (wrap as origin-request envelope, body base64)
//!     → invoker.rs (in-process function, or Lambda-compatible endpoint)
//!     → render.rs
//!         response-shaped result → status, headers, body as returned
//!         request-shaped result  → 204 + X-Edge-Passthrough / X-Edge-URI
//!         invocation failure     → 502
//! ```
//!
//! # Design Decisions
//! - The bridge never contacts a real origin; passthrough is only signalled
//! - One task per connection; no state shared beyond immutable `Arc`s
//! - Every request gets an answer, including malformed function results

pub mod adapter;
pub mod invoker;
pub mod render;

pub use adapter::{build_event, BridgeServer};
pub use invoker::{invoker_from_config, BridgeError, InProcessInvoker, Invoker, LambdaInvoker};
pub use render::{render_error, render_result, Rendered, X_EDGE_PASSTHROUGH, X_EDGE_URI};
