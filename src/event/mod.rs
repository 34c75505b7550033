//! Edge event subsystem.
//!
//! # Data Flow
//! ```text
//! edge envelope (JSON)
//!     → envelope.rs (wire shapes, unknown fields retained)
//!     → codec.rs decode → EdgeRequest | EdgeResponse
//!     → [pipeline produces Outcome]
//!     → codec.rs encode → response map, or the original request map
//! ```
//!
//! # Design Decisions
//! - Wire structs and normalized structs are separate types
//! - Passthrough hands the request record back as received
//! - Header map keys are always lower-cased on the way out

pub mod codec;
pub mod envelope;
pub mod headers;
pub mod request;
pub mod response;

pub use codec::{decode, encode, CodecError, EdgeEvent, Outcome, Payload};
pub use envelope::{BodyEncoding, EventType, WireEvent};
pub use headers::{HeaderEntry, Headers};
pub use request::{Body, BodyError, EdgeRequest};
pub use response::EdgeResponse;
