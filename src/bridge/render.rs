//! Turning an edge function result into an HTTP response.
//!
//! # Responsibilities
//! - Response-shaped results: status, headers, body as the function returned them
//! - Request-shaped results: 204 with the passthrough marker headers
//! - Everything else, and invocation failures: 502 with a short text body

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use serde_json::Value;

use crate::bridge::invoker::BridgeError;
use crate::event::envelope::{BodyEncoding, CfResponse};
use crate::event::EdgeResponse;

/// Set to `true` when the function handed the request back to the origin.
pub const X_EDGE_PASSTHROUGH: &str = "x-edge-passthrough";

/// The `uri` of the request the function handed back.
pub const X_EDGE_URI: &str = "x-edge-uri";

const UNEXPECTED_RESULT: &str = "Unexpected edge function result";

/// A rendered response plus the label it is counted under.
#[derive(Debug)]
pub struct Rendered {
    pub outcome: &'static str,
    pub response: Response,
}

/// Render a function result.
pub fn render_result(result: Value) -> Rendered {
    if result.get("status").is_some() {
        return match response_from_value(result) {
            Some(response) => Rendered {
                outcome: "response",
                response,
            },
            None => unexpected(),
        };
    }

    if let Some(uri) = result.get("uri").and_then(Value::as_str) {
        return Rendered {
            outcome: "passthrough",
            response: passthrough(uri),
        };
    }

    unexpected()
}

/// 502 carrying the invocation error.
pub fn render_error(error: &BridgeError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        format!("Edge function invocation error: {}", error),
    )
        .into_response()
}

fn unexpected() -> Rendered {
    tracing::warn!("Edge function returned neither a response nor a request");
    Rendered {
        outcome: "unexpected",
        response: (StatusCode::BAD_GATEWAY, UNEXPECTED_RESULT).into_response(),
    }
}

fn passthrough(uri: &str) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(X_EDGE_PASSTHROUGH, HeaderValue::from_static("true"));
    match HeaderValue::from_str(uri) {
        Ok(value) => {
            headers.insert(X_EDGE_URI, value);
        }
        Err(_) => tracing::warn!(uri = %uri, "Passthrough uri is not a valid header value"),
    }
    response
}

fn response_from_value(result: Value) -> Option<Response> {
    let wire: CfResponse = serde_json::from_value(result)
        .map_err(|e| tracing::warn!(error = %e, "Malformed response result"))
        .ok()?;
    let edge = EdgeResponse::try_from(wire)
        .map_err(|e| tracing::warn!(error = %e, "Response result has an invalid status"))
        .ok()?;

    let body = match (edge.body.as_deref(), edge.body_encoding) {
        (None, _) => Vec::new(),
        (Some(data), Some(BodyEncoding::Base64)) => base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| tracing::warn!(error = %e, "Response body is not valid base64"))
            .ok()?,
        (Some(data), _) => data.as_bytes().to_vec(),
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = edge.status;

    let headers = response.headers_mut();
    for (name, value) in edge.headers.flatten() {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            tracing::warn!(header = %name, "Dropping invalid response header");
            continue;
        };
        // Framing headers are recomputed for the body actually sent.
        if name == CONTENT_LENGTH || name == TRANSFER_ENCODING {
            continue;
        }
        headers.append(name, value);
    }

    Some(response)
}
