//! Normalized edge response.
//!
//! # Design Decisions
//! - Only the body-bearing constructors can attach a body, and each of them
//!   sets `content-type`
//! - Handler responses carry `cache-control: no-cache`
//! - `statusDescription` is informational; it defaults to the canonical reason

use axum::http::StatusCode;
use serde_json::{Map, Value};

use crate::event::envelope::{BodyEncoding, CfResponse};
use crate::event::headers::Headers;

/// Error returned when a wire response carries an unusable status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid response status '{0}'")]
pub struct InvalidStatus(pub String);

/// A response as built by handlers or received at the response stage.
#[derive(Debug, Clone)]
pub struct EdgeResponse {
    pub status: StatusCode,
    pub status_description: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub body_encoding: Option<BodyEncoding>,
    pub extra: Map<String, Value>,
}

impl EdgeResponse {
    /// Response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            status_description: status.canonical_reason().unwrap_or_default().to_string(),
            headers: Headers::new(),
            body: None,
            body_encoding: None,
            extra: Map::new(),
        }
    }

    /// Response with a body and its content type.
    pub fn with_body(status: StatusCode, content_type: &str, body: impl Into<String>) -> Self {
        let mut response = Self::empty(status);
        response.headers.insert("Content-Type", content_type);
        response.body = Some(body.into());
        response
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::with_body(status, "text/plain", body).no_cache()
    }

    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::with_body(status, "application/json", body.to_string())
    }

    /// `{"error": message}` with the given status.
    pub fn json_error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::json(status, &serde_json::json!({ "error": message.into() }))
    }

    /// 302 to `location`, no body.
    pub fn redirect(location: &str) -> Self {
        let mut response = Self::empty(StatusCode::FOUND);
        response.headers.insert("Location", location);
        response.no_cache()
    }

    pub fn no_cache(mut self) -> Self {
        self.headers.insert("Cache-Control", "no-cache");
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn into_wire(self) -> CfResponse {
        CfResponse {
            status: self.status.as_u16().to_string(),
            status_description: self.status_description,
            headers: self.headers,
            body: self.body,
            body_encoding: self.body_encoding,
            extra: self.extra,
        }
    }
}

impl TryFrom<CfResponse> for EdgeResponse {
    type Error = InvalidStatus;

    fn try_from(wire: CfResponse) -> Result<Self, Self::Error> {
        let status = wire
            .status
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|code| (100..600).contains(code))
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| InvalidStatus(wire.status.clone()))?;

        Ok(Self {
            status,
            status_description: wire.status_description,
            headers: wire.headers,
            body: wire.body,
            body_encoding: wire.body_encoding,
            extra: wire.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_constructors_set_content_type() {
        let text = EdgeResponse::text(StatusCode::OK, "hello edge");
        assert_eq!(text.headers.first("content-type"), Some("text/plain"));
        assert_eq!(text.headers.first("cache-control"), Some("no-cache"));

        let err = EdgeResponse::json_error(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(err.headers.first("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(err.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["error"], "nope");
    }

    #[test]
    fn test_redirect_has_location_and_no_body() {
        let r = EdgeResponse::redirect("/fn/index");
        assert_eq!(r.status, StatusCode::FOUND);
        assert_eq!(r.status_description, "Found");
        assert_eq!(r.headers.first("location"), Some("/fn/index"));
        assert!(r.body.is_none());
    }

    #[test]
    fn test_wire_status_parsing() {
        let ok = CfResponse {
            status: "404".into(),
            ..Default::default()
        };
        assert_eq!(EdgeResponse::try_from(ok).unwrap().status, StatusCode::NOT_FOUND);

        let bad = CfResponse {
            status: "abc".into(),
            ..Default::default()
        };
        assert!(EdgeResponse::try_from(bad).is_err());
    }
}
