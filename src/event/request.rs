//! Normalized edge request.
//!
//! # Responsibilities
//! - Parse the wire method into `http::Method`
//! - Normalize an empty `uri` to `/`
//! - Decode bodies (`text` passes through, `base64` is decoded as UTF-8)
//! - Keep the wire record exactly as received so passthrough can return it

use axum::http::Method;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::event::envelope::{BodyEncoding, CfBody, CfRequest};
use crate::event::headers::Headers;

/// Errors from reading a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Request body as delivered by the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub data: String,
    pub encoding: BodyEncoding,
    pub input_truncated: bool,
    pub action: String,
}

impl Body {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            encoding: BodyEncoding::Text,
            input_truncated: false,
            action: "read-only".to_string(),
        }
    }

    /// Wrap raw bytes as a base64 body.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            encoding: BodyEncoding::Base64,
            input_truncated: false,
            action: "read-only".to_string(),
        }
    }

    /// Decode the body to text.
    pub fn decode_text(&self) -> Result<String, BodyError> {
        match self.encoding {
            BodyEncoding::Text => Ok(self.data.clone()),
            BodyEncoding::Base64 => {
                let bytes = STANDARD.decode(self.data.as_bytes())?;
                Ok(String::from_utf8(bytes)?)
            }
        }
    }
}

/// A request as seen by handlers.
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    pub method: Method,
    pub uri: String,
    pub querystring: String,
    pub headers: Headers,
    pub body: Option<Body>,

    /// Wire fields the edge does not interpret (e.g. `clientIp`, `origin`).
    pub extra: Map<String, Value>,

    /// Method string exactly as received, used when handing the request back.
    raw_method: String,

    /// The request record as it arrived on the wire, if it was decoded.
    original: Option<Value>,
}

impl EdgeRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        let raw_method = method.as_str().to_string();
        Self {
            method,
            uri: normalize_uri(uri.into()),
            querystring: String::new(),
            headers: Headers::new(),
            body: None,
            extra: Map::new(),
            raw_method,
            original: None,
        }
    }

    /// Attach the wire record this request was decoded from.
    pub fn with_original(mut self, original: Value) -> Self {
        self.original = Some(original);
        self
    }

    /// The wire record as received; `None` for requests built in code.
    pub fn original(&self) -> Option<&Value> {
        self.original.as_ref()
    }

    /// The wire record to hand back on passthrough: the received record when
    /// there is one, otherwise the serialized normalized request.
    pub fn into_passthrough(self) -> Result<Value, serde_json::Error> {
        match self.original {
            Some(original) => Ok(original),
            None => serde_json::to_value(self.into_wire()),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_querystring(mut self, querystring: impl Into<String>) -> Self {
        self.querystring = querystring.into();
        self
    }

    /// Request path; never empty.
    pub fn path(&self) -> &str {
        &self.uri
    }

    /// Body decoded to text; a missing body reads as an empty string.
    pub fn body_text(&self) -> Result<String, BodyError> {
        match &self.body {
            Some(body) => body.decode_text(),
            None => Ok(String::new()),
        }
    }

    /// First `host` header value, if any.
    pub fn host(&self) -> Option<&str> {
        self.headers.first("host").filter(|h| !h.is_empty())
    }

    pub fn into_wire(self) -> CfRequest {
        CfRequest {
            method: self.raw_method,
            uri: self.uri,
            querystring: self.querystring,
            headers: self.headers,
            body: self.body.map(|b| CfBody {
                input_truncated: b.input_truncated,
                action: b.action,
                encoding: b.encoding,
                data: b.data,
            }),
            extra: self.extra,
        }
    }
}

impl From<CfRequest> for EdgeRequest {
    fn from(wire: CfRequest) -> Self {
        // CloudFront only delivers standard verbs; anything unparsable is
        // treated as GET for matching but handed back as received.
        let method = if wire.method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(wire.method.as_bytes()).unwrap_or(Method::GET)
        };
        let raw_method = if wire.method.is_empty() {
            Method::GET.as_str().to_string()
        } else {
            wire.method
        };

        Self {
            method,
            uri: normalize_uri(wire.uri),
            querystring: wire.querystring,
            headers: wire.headers,
            body: wire.body.map(|b| Body {
                data: b.data,
                encoding: b.encoding,
                input_truncated: b.input_truncated,
                action: b.action,
            }),
            extra: wire.extra,
            raw_method,
            original: None,
        }
    }
}

fn normalize_uri(uri: String) -> String {
    if uri.is_empty() {
        "/".to_string()
    } else {
        uri
    }
}
