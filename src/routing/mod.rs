//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! EdgeRequest (path, method)
//!     → router.rs (exact lookup in the route table)
//!     → matcher.rs (path, or path + method)
//!     → matched handler, or the dispatcher's fallback
//!
//! Route table construction (once, at startup):
//!     RouteTable::builder()
//!     → register (path) / (path, method) entries
//!     → reject overlapping registrations
//!     → freeze as immutable table
//! ```
//!
//! # Design Decisions
//! - Tables are built explicitly and passed in; there is no global registry
//! - Exact matching only; prefix checks live in the handlers that need them
//! - Overlapping registrations fail construction instead of picking a winner
//! - A miss is an outcome (passthrough or fixed 400), not an error

pub mod handler;
pub mod matcher;
pub mod router;

pub use handler::{fallthrough, handler_fn, HandlerFuture, RequestHandler, SharedHandler};
pub use matcher::{PathPrefix, RouteMatcher};
pub use router::{Dispatcher, Fallback, RouteError, RouteTable, RouteTableBuilder};
