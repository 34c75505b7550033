//! Health documents exchanged with the origin.
//!
//! # States
//! - `OK`: component is healthy
//! - `LIVE`: process is running (liveness)
//! - `READY`: process and dependencies can serve (readiness)
//! - `DEGRADED`: partially working
//! - `ERROR`: not working
//!
//! Any other string is preserved verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status vocabulary shared by the edge and the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Ok,
    Live,
    Ready,
    Degraded,
    Error,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Ok => "OK",
            HealthStatus::Live => "LIVE",
            HealthStatus::Ready => "READY",
            HealthStatus::Degraded => "DEGRADED",
            HealthStatus::Error => "ERROR",
            HealthStatus::Other(s) => s,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => HealthStatus::Ok,
            "LIVE" => HealthStatus::Live,
            "READY" => HealthStatus::Ready,
            "DEGRADED" => HealthStatus::Degraded,
            "ERROR" => HealthStatus::Error,
            _ => HealthStatus::Other(s),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A health report: overall status, per-component statuses, optional error.
///
/// `error` is kept as the origin sent it. A present key fails the document
/// even when its value is `null` or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<HealthStatus>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<Value>,

    /// Sub-component name → status (or any other detail the origin reports).
    #[serde(flatten)]
    pub components: Map<String, Value>,
}

impl HealthDocument {
    pub fn with_status(status: HealthStatus) -> Self {
        Self {
            health_status: Some(status),
            ..Default::default()
        }
    }

    /// A failed probe document.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(error.into())),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, name: impl Into<String>, status: impl Into<Value>) -> Self {
        self.components.insert(name.into(), status.into());
        self
    }

    /// An `error` key marks the document failed whatever its status or value says.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Healthy iff there is no error and the status equals `sentinel`.
    pub fn reports(&self, sentinel: &HealthStatus) -> bool {
        !self.is_failed() && self.health_status.as_ref() == Some(sentinel)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// `Some` for any value the key carries, `null` included.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_origin_document() {
        let doc: HealthDocument = serde_json::from_value(json!({
            "health_status": "DEGRADED",
            "database": "ERROR",
            "version": "test"
        }))
        .unwrap();

        assert_eq!(doc.health_status, Some(HealthStatus::Degraded));
        assert_eq!(doc.components["database"], "ERROR");
        assert!(!doc.is_failed());
        assert!(!doc.reports(&HealthStatus::Ok));
    }

    #[test]
    fn test_error_overrides_status() {
        let doc: HealthDocument = serde_json::from_value(json!({
            "health_status": "OK",
            "error": "boom"
        }))
        .unwrap();

        assert!(doc.is_failed());
        assert!(!doc.reports(&HealthStatus::Ok));
    }

    #[test]
    fn test_null_error_still_fails() {
        let doc: HealthDocument = serde_json::from_value(json!({
            "health_status": "OK",
            "error": null
        }))
        .unwrap();

        assert_eq!(doc.error, Some(Value::Null));
        assert!(doc.is_failed());
        assert!(!doc.reports(&HealthStatus::Ok));
        assert_eq!(doc.to_value(), json!({ "health_status": "OK", "error": null }));

        let doc: HealthDocument = serde_json::from_value(json!({ "health_status": "OK" })).unwrap();
        assert_eq!(doc.error, None);
        assert!(doc.reports(&HealthStatus::Ok));
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let doc: HealthDocument = serde_json::from_value(json!({ "health_status": "WARMING" })).unwrap();
        assert_eq!(doc.health_status, Some(HealthStatus::Other("WARMING".into())));
        assert_eq!(doc.to_value(), json!({ "health_status": "WARMING" }));
    }

    #[test]
    fn test_failed_document_shape() {
        assert_eq!(
            HealthDocument::failed("connection refused").to_value(),
            json!({ "error": "connection refused" })
        );
    }
}
