//! Edge gateway core.
//!
//! CDN edge functions (request and response stages) plus a local HTTP bridge
//! that runs them in front of a development origin.

pub mod bridge;
pub mod config;
pub mod event;
pub mod functions;
pub mod handlers;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use bridge::BridgeServer;
pub use config::EdgeConfig;
pub use functions::{EdgeFunction, FunctionKind};
pub use lifecycle::Shutdown;
