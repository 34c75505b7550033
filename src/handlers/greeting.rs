//! Prefix greeting: answers every path under a prefix with a fixed body,
//! forwards everything else.

use axum::http::StatusCode;
use futures_util::FutureExt;

use crate::event::{EdgeRequest, EdgeResponse, Outcome};
use crate::routing::{HandlerFuture, PathPrefix, RequestHandler};

pub const GREETING: &str = "hello edge";

#[derive(Debug, Clone)]
pub struct PrefixGreeting {
    prefix: PathPrefix,
}

impl PrefixGreeting {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: PathPrefix::new(prefix),
        }
    }
}

impl RequestHandler for PrefixGreeting {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        let outcome = if self.prefix.matches(&request) {
            Outcome::Respond(EdgeResponse::text(StatusCode::OK, GREETING))
        } else {
            Outcome::Forward(request)
        };
        async move { outcome }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[tokio::test]
    async fn test_greets_under_prefix_only() {
        let greeting = PrefixGreeting::new("/edge/auth/");

        let out = greeting.handle(EdgeRequest::new(Method::GET, "/edge/auth/test")).await;
        let resp = out.response().unwrap();
        assert_eq!(resp.body.as_deref(), Some(GREETING));
        assert_eq!(resp.headers.first("content-type"), Some("text/plain"));

        let out = greeting.handle(EdgeRequest::new(Method::GET, "/other/page")).await;
        assert!(out.is_forward());
    }
}
