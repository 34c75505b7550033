//! Request-stage handler abstraction.

use std::future::Future;
use std::sync::Arc;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::event::{EdgeRequest, Outcome};

/// Future returned by request handlers.
pub type HandlerFuture<'a> = BoxFuture<'a, Outcome>;

/// Something that turns a request into an outcome.
///
/// Handlers never fail: every error they can hit is turned into a response.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_>;
}

/// Handlers are shared between route tables and connections.
pub type SharedHandler = Arc<dyn RequestHandler>;

struct FnHandler<F>(F);

impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(EdgeRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        (self.0)(request).boxed()
    }
}

/// Wrap an async function as a handler.
pub fn handler_fn<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(EdgeRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

struct Fallthrough {
    first: SharedHandler,
    second: SharedHandler,
}

impl RequestHandler for Fallthrough {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        async move {
            match self.first.handle(request).await {
                Outcome::Forward(request) => self.second.handle(request).await,
                answered => answered,
            }
        }
        .boxed()
    }
}

/// Run `first`; if it forwards the request, give `second` a chance.
pub fn fallthrough(first: SharedHandler, second: SharedHandler) -> SharedHandler {
    Arc::new(Fallthrough { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use crate::event::EdgeResponse;

    #[tokio::test]
    async fn test_fallthrough_only_on_forward() {
        let forward = handler_fn(|req| async move { Outcome::Forward(req) });
        let answer = handler_fn(|_req| async move {
            Outcome::Respond(EdgeResponse::text(StatusCode::OK, "second"))
        });

        let chained = fallthrough(forward.clone(), answer.clone());
        let out = chained.handle(EdgeRequest::new(Method::GET, "/")).await;
        assert_eq!(out.response().and_then(|r| r.body.as_deref()), Some("second"));

        let chained = fallthrough(answer, forward);
        let out = chained.handle(EdgeRequest::new(Method::GET, "/")).await;
        assert!(!out.is_forward());
    }
}
