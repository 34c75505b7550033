//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Readiness request (host header)
//!     → prober.rs candidate list: [host, fallback(:port)]
//!     → HTTPS GET <health path> per candidate, Host = original host
//!     → first 200 + JSON wins, otherwise last error recorded
//!     → document.rs HealthDocument (status, components, error)
//! ```
//!
//! # Design Decisions
//! - Probing is sequential; a failed candidate is never retried
//! - Every attempt carries its own timeout
//! - Probe failures never escape the prober; they become an `error` field
//! - Documents are built per probe and never cached

pub mod document;
pub mod prober;

pub use document::{HealthDocument, HealthStatus};
pub use prober::{candidate_targets, probe_candidates, HealthProbe, HttpsProber, ProbeError};
