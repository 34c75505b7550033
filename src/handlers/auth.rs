//! Credential callback.
//!
//! Decodes the identity claims carried by an already-issued credential
//! (JWT) posted to the callback path. The signature is not checked and no
//! session is issued here.

use axum::http::StatusCode;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use futures_util::FutureExt;
use serde_json::{json, Value};
use thiserror::Error;

use crate::event::{EdgeRequest, EdgeResponse, Outcome};
use crate::routing::{HandlerFuture, RequestHandler};

/// Failures while decoding a posted credential.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid credential format: expected 3 segments, found {0}")]
    InvalidCredentialFormat(usize),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Decode the middle segment of `header.payload.signature` into JSON claims.
pub fn decode_jwt_payload(token: &str) -> Result<Value, CredentialError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(CredentialError::InvalidCredentialFormat(segments.len()));
    }

    let mut payload = segments[1].to_string();
    while payload.len() % 4 != 0 {
        payload.push('=');
    }

    let bytes = URL_SAFE
        .decode(payload.as_bytes())
        .map_err(|e| CredentialError::MalformedPayload(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| CredentialError::MalformedPayload(e.to_string()))
}

/// Body → JSON → `credential` → claims.
pub fn decode_credential_claims(request: &EdgeRequest) -> Result<Value, CredentialError> {
    let body = request
        .body_text()
        .map_err(|e| CredentialError::MalformedPayload(e.to_string()))?;

    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| CredentialError::MalformedPayload(e.to_string()))?;

    let credential = match payload.get("credential") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(CredentialError::MalformedPayload(
                "credential must be a string".to_string(),
            ))
        }
    };

    decode_jwt_payload(credential)
}

/// Handles `POST <callback path>`.
#[derive(Debug, Clone, Default)]
pub struct CredentialCallback;

impl CredentialCallback {
    pub fn respond(&self, request: &EdgeRequest) -> EdgeResponse {
        match decode_credential_claims(request) {
            Ok(claims) => {
                tracing::info!(
                    subject = claims.get("sub").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
                    "Credential callback decoded"
                );
                EdgeResponse::json(StatusCode::OK, &json!({ "status": "ok" })).no_cache()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential callback rejected");
                EdgeResponse::json_error(StatusCode::BAD_REQUEST, e.to_string()).no_cache()
            }
        }
    }
}

impl RequestHandler for CredentialCallback {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        let response = self.respond(&request);
        async move { Outcome::Respond(response) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use crate::event::Body;

    fn token_for(claims: &Value) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    fn callback_request(body: Body) -> EdgeRequest {
        EdgeRequest::new(Method::POST, "/edge/auth/google/callback").with_body(body)
    }

    #[test]
    fn test_decodes_payload_segment() {
        let claims = decode_jwt_payload(&token_for(&json!({ "sub": "u1" }))).unwrap();
        assert_eq!(claims, json!({ "sub": "u1" }));
    }

    #[test]
    fn test_restores_padding() {
        // 13 bytes of JSON encode to 18 characters; two '=' are restored.
        let claims = json!({ "a": "bcdef" });
        assert_eq!(claims.to_string().len() % 3, 1);
        assert_eq!(decode_jwt_payload(&token_for(&claims)).unwrap(), claims);
    }

    #[test]
    fn test_two_segments_is_invalid_format() {
        assert_eq!(
            decode_jwt_payload("header.payload"),
            Err(CredentialError::InvalidCredentialFormat(2))
        );
        assert_eq!(
            decode_jwt_payload(""),
            Err(CredentialError::InvalidCredentialFormat(1))
        );
    }

    #[test]
    fn test_payload_not_json_is_malformed() {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            decode_jwt_payload(&token),
            Err(CredentialError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_callback_accepts_base64_body() {
        let body = json!({ "credential": token_for(&json!({ "sub": "u1" })) }).to_string();
        let req = callback_request(Body::from_bytes(body.as_bytes()));

        let resp = CredentialCallback.respond(&req);
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body.as_deref(), Some(r#"{"status":"ok"}"#));
        assert_eq!(resp.headers.first("content-type"), Some("application/json"));
    }

    #[test]
    fn test_callback_rejects_bad_input_with_400() {
        for body in ["not json", r#"{"credential":"only.two"}"#, r#"{"other":1}"#, r#"{"credential":5}"#] {
            let resp = CredentialCallback.respond(&callback_request(Body::text(body)));
            assert_eq!(resp.status, StatusCode::BAD_REQUEST, "body: {}", body);

            let parsed: Value = serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
            assert!(parsed["error"].is_string());
        }
    }
}
