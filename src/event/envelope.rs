//! Wire shapes of the edge event envelope.
//!
//! ```text
//! { "Records": [ { "cf": {
//!     "config":   { "distributionId": "...", "eventType": "origin-request" },
//!     "request":  { ... },          // request-stage events
//!     "response": { ... }           // response-stage events
//! } } ] }
//! ```
//!
//! Every record type keeps unknown fields in `extra` so that a request the
//! edge declines to handle can be handed back exactly as it arrived.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::event::headers::Headers;

/// Top-level envelope delivered by the edge host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "Records")]
    pub records: Vec<WireRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecord {
    pub cf: CfEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfEvent {
    pub config: CfConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<CfRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CfResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfConfig {
    #[serde(default)]
    pub distribution_id: String,

    pub event_type: EventType,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lifecycle stage the event was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    ViewerRequest,
    OriginRequest,
    OriginResponse,
    ViewerResponse,
}

impl EventType {
    /// Request-stage events carry a request record and may be answered directly.
    pub fn is_request_stage(&self) -> bool {
        matches!(self, EventType::ViewerRequest | EventType::OriginRequest)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ViewerRequest => "viewer-request",
            EventType::OriginRequest => "origin-request",
            EventType::OriginResponse => "origin-response",
            EventType::ViewerResponse => "viewer-response",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request record as it travels on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfRequest {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub uri: String,

    #[serde(default)]
    pub querystring: String,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<CfBody>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfBody {
    #[serde(default)]
    pub input_truncated: bool,

    #[serde(default = "default_body_action")]
    pub action: String,

    #[serde(default)]
    pub encoding: BodyEncoding,

    #[serde(default)]
    pub data: String,
}

fn default_body_action() -> String {
    "read-only".to_string()
}

/// How a body's `data` is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    #[default]
    Text,
    Base64,
}

/// Response record as it travels on the wire.
///
/// Edge hosts send `status` as a string; numbers are accepted as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfResponse {
    #[serde(deserialize_with = "status_from_string_or_number")]
    pub status: String,

    #[serde(default)]
    pub status_description: String,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn status_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "status must be a string or number, got {}",
            other
        ))),
    }
}
