//! Envelope ⇄ normalized model translation.

use serde_json::Value;
use thiserror::Error;

use crate::event::envelope::{CfConfig, EventType, WireEvent};
use crate::event::request::EdgeRequest;
use crate::event::response::EdgeResponse;

/// Errors from decoding an envelope.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The envelope does not have the expected nested shape.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Serializing a result failed.
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The record carried by a decoded envelope.
#[derive(Debug, Clone)]
pub enum Payload {
    Request(EdgeRequest),
    Response(EdgeResponse),
}

/// A decoded edge event.
#[derive(Debug, Clone)]
pub struct EdgeEvent {
    pub config: CfConfig,
    pub payload: Payload,
}

impl EdgeEvent {
    pub fn event_type(&self) -> EventType {
        self.config.event_type
    }
}

/// What a pipeline produced for one event.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The edge answered; the origin is not contacted.
    Respond(EdgeResponse),
    /// Not handled here; forward the request upstream unchanged. A decoded
    /// request is handed back exactly as received; edits to its fields are
    /// not reflected.
    Forward(EdgeRequest),
}

impl Outcome {
    pub fn is_forward(&self) -> bool {
        matches!(self, Outcome::Forward(_))
    }

    pub fn response(&self) -> Option<&EdgeResponse> {
        match self {
            Outcome::Respond(r) => Some(r),
            Outcome::Forward(_) => None,
        }
    }
}

/// Decode an envelope held as JSON.
pub fn decode(envelope: Value) -> Result<EdgeEvent, CodecError> {
    let original_request = envelope.pointer("/Records/0/cf/request").cloned();
    let event: WireEvent = serde_json::from_value(envelope)
        .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;

    let record = event
        .records
        .into_iter()
        .next()
        .ok_or_else(|| CodecError::MalformedEnvelope("Records is empty".to_string()))?;

    let cf = record.cf;
    let event_type = cf.config.event_type;

    let payload = if event_type.is_request_stage() {
        let request = cf.request.ok_or_else(|| {
            CodecError::MalformedEnvelope(format!("{} event has no request", event_type))
        })?;
        let request = EdgeRequest::from(request);
        Payload::Request(match original_request {
            Some(original) => request.with_original(original),
            None => request,
        })
    } else {
        let response = cf.response.ok_or_else(|| {
            CodecError::MalformedEnvelope(format!("{} event has no response", event_type))
        })?;
        let response = EdgeResponse::try_from(response)
            .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;
        Payload::Response(response)
    };

    Ok(EdgeEvent {
        config: cf.config,
        payload,
    })
}

/// Decode an envelope from raw JSON bytes.
pub fn decode_slice(bytes: &[u8]) -> Result<EdgeEvent, CodecError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;
    decode(value)
}

/// Encode a response into its wire map.
pub fn encode_response(response: EdgeResponse) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(response.into_wire())?)
}

/// Encode a request into its wire map; decoded requests come back as received.
pub fn encode_request(request: EdgeRequest) -> Result<Value, CodecError> {
    Ok(request.into_passthrough()?)
}

/// Encode a pipeline outcome.
pub fn encode(outcome: Outcome) -> Result<Value, CodecError> {
    match outcome {
        Outcome::Respond(response) => encode_response(response),
        Outcome::Forward(request) => encode_request(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn request_event(request: Value) -> Value {
        json!({
            "Records": [{
                "cf": {
                    "config": { "distributionId": "EXAMPLE", "eventType": "origin-request" },
                    "request": request
                }
            }]
        })
    }

    #[test]
    fn test_decode_request_event() {
        let event = decode(request_event(json!({
            "method": "POST",
            "uri": "/edge/auth/google/callback",
            "querystring": "a=1",
            "headers": { "host": [{ "key": "Host", "value": "example.com" }] },
            "body": { "encoding": "base64", "data": "aGVsbG8=" }
        })))
        .unwrap();

        assert_eq!(event.event_type(), EventType::OriginRequest);
        assert_eq!(event.config.distribution_id, "EXAMPLE");
        let Payload::Request(req) = event.payload else {
            panic!("expected request payload");
        };
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.querystring, "a=1");
        assert_eq!(req.host(), Some("example.com"));
        assert_eq!(req.body_text().unwrap(), "hello");
    }

    #[test]
    fn test_decode_response_event_accepts_numeric_status() {
        let event = decode(json!({
            "Records": [{
                "cf": {
                    "config": { "distributionId": "EXAMPLE", "eventType": "origin-response" },
                    "response": { "status": 404, "statusDescription": "Not Found", "headers": {} }
                }
            }]
        }))
        .unwrap();

        let Payload::Response(resp) = event.payload else {
            panic!("expected response payload");
        };
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_malformed_envelopes() {
        assert!(matches!(
            decode(json!({})),
            Err(CodecError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            decode(json!({ "Records": [] })),
            Err(CodecError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            decode(json!({ "Records": [{ "cf": { "config": { "eventType": "origin-request" } } }] })),
            Err(CodecError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            decode(json!({ "Records": [{ "cf": { "config": { "eventType": "origin-response" } } }] })),
            Err(CodecError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_forward_returns_request_verbatim() {
        let original = json!({
            "clientIp": "203.0.113.1",
            "method": "GET",
            "uri": "/other/page",
            "querystring": "",
            "headers": { "host": [{ "key": "Host", "value": "example.com" }] }
        });
        let event = decode(request_event(original.clone())).unwrap();
        let Payload::Request(req) = event.payload else {
            panic!("expected request payload");
        };

        let encoded = encode(Outcome::Forward(req)).unwrap();
        assert_eq!(encoded, original);
    }

    #[test]
    fn test_forward_keeps_irregular_request_untouched() {
        let original = json!({
            "headers": {
                "Host": [{ "key": "Host", "value": "example.com" }],
                "X-Trace": [{ "value": "abc" }]
            },
            "uri": "",
            "body": { "encoding": "text", "data": "hi" }
        });
        let event = decode(request_event(original.clone())).unwrap();
        let Payload::Request(req) = event.payload else {
            panic!("expected request payload");
        };
        assert_eq!(req.path(), "/");
        assert_eq!(req.host(), Some("example.com"));

        let encoded = encode(Outcome::Forward(req)).unwrap();
        assert_eq!(encoded, original);
        assert!(encoded.get("querystring").is_none());
        assert!(encoded.get("method").is_none());
        assert!(encoded["body"].get("action").is_none());
    }

    #[test]
    fn test_forward_of_constructed_request_serializes_fields() {
        let req = EdgeRequest::new(Method::GET, "/built").with_header("Host", "example.com");
        let encoded = encode(Outcome::Forward(req)).unwrap();

        assert_eq!(encoded["method"], "GET");
        assert_eq!(encoded["uri"], "/built");
        assert_eq!(encoded["headers"]["host"][0]["value"], "example.com");
    }

    #[test]
    fn test_encode_response_shape() {
        let encoded = encode(Outcome::Respond(EdgeResponse::text(StatusCode::OK, "hello edge"))).unwrap();

        assert_eq!(encoded["status"], "200");
        assert_eq!(encoded["statusDescription"], "OK");
        assert_eq!(encoded["body"], "hello edge");
        assert_eq!(
            encoded["headers"]["content-type"],
            json!([{ "key": "Content-Type", "value": "text/plain" }])
        );
    }
}
