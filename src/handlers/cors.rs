//! Identity-federation header injection.
//!
//! Browsers only allow federated credential prompts when the page is served
//! with these policies; the origin does not set them, so the edge does.

use crate::event::EdgeResponse;
use crate::handlers::ResponseHandler;

/// Headers written onto every origin response, in wire casing.
pub const FEDERATION_HEADERS: [(&str, &str); 3] = [
    (
        "Permissions-Policy",
        r#"identity-credentials-get=(self "https://accounts.google.com")"#,
    ),
    ("Cross-Origin-Opener-Policy", "same-origin-allow-popups"),
    ("Cross-Origin-Resource-Policy", "cross-origin"),
];

/// Overwrites the federation headers and leaves everything else alone.
#[derive(Debug, Clone, Default)]
pub struct FederationHeaders;

impl ResponseHandler for FederationHeaders {
    fn handle(&self, mut response: EdgeResponse) -> EdgeResponse {
        for (name, value) in FEDERATION_HEADERS {
            response.headers.insert(name, value);
        }
        response
    }
}
