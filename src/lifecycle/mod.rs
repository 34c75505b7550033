//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! SIGINT / SIGTERM (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → every subscriber's receiver fires
//!     → bridge stops accepting, drains, exits
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; servers take a receiver, not the coordinator
//! - A second signal is not special: draining is bounded by request timeouts

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
