//! Resolver chain composition and per-request dispatch.
//!
//! # Responsibilities
//! - Wrap each resolver around the next handler as a tower service
//! - Emit a redirect on a hit, delegate the untouched request on a miss
//! - Terminate in a caller-supplied handler
//!
//! # Design Decisions
//! - Built inside-out once at startup; the first configured source is outermost
//! - Every level is erased into an axum `Router` so chains of any length share one type
//! - The request path is percent-decoded once and otherwise used verbatim
//!   (no normalization, case-sensitive); undecodable paths are a miss

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures_util::future::{self, BoxFuture};
use percent_encoding::percent_decode_str;
use tower::{Layer, Service, ServiceExt};

use crate::observability::metrics;
use crate::resolver::{Redirect, Resolver};

/// Layer wrapping an inner service with one resolver.
#[derive(Clone)]
pub struct RedirectLayer {
    resolver: Arc<dyn Resolver>,
}

impl RedirectLayer {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for RedirectLayer {
    type Service = RedirectService<S>;

    fn layer(&self, next: S) -> Self::Service {
        RedirectService {
            resolver: self.resolver.clone(),
            next,
        }
    }
}

/// One level of the chain: a resolver plus the handler to fall back to.
#[derive(Clone)]
pub struct RedirectService<S> {
    resolver: Arc<dyn Resolver>,
    next: S,
}

impl<S> Service<Request> for RedirectService<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // `next` is driven to readiness by `oneshot` only when it is needed.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let source = self.resolver.name();
        let resolved = request_path(request.uri().path()).and_then(|path| self.resolver.resolve(&path));

        if let Some(redirect) = resolved {
            let Redirect { location, status } = redirect.clone();
            match redirect.try_into_response() {
                Ok(response) => {
                    tracing::debug!(
                        source = %source,
                        path = %request.uri().path(),
                        location = %location,
                        status = status.as_u16(),
                        "Redirecting"
                    );
                    metrics::record_resolution(source, "redirect");
                    return Box::pin(future::ready(Ok(response)));
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source,
                        path = %request.uri().path(),
                        error = %e,
                        "Resolved location is not a valid header value, falling through"
                    );
                }
            }
        }

        metrics::record_resolution(source, "fallthrough");
        let next = self.next.clone();
        Box::pin(next.oneshot(request))
    }
}

/// Percent-decode the URI path once. `None` when it does not decode to UTF-8.
fn request_path(raw: &str) -> Option<Cow<'_, str>> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(path) => Some(path),
        Err(_) => {
            tracing::debug!(path = %raw, "Request path is not valid UTF-8 once decoded");
            None
        }
    }
}

/// Ordered list of resolvers, first entry tried first.
#[derive(Debug, Default, Clone)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Append a resolver after those already in the chain.
    pub fn push(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Source names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// First redirect any resolver yields for an already decoded `path`, without going through HTTP.
    pub fn resolve(&self, path: &str) -> Option<Redirect> {
        self.resolvers.iter().find_map(|r| r.resolve(path))
    }

    /// Compose the chain around `terminal`, which answers when nothing matches.
    pub fn into_service<T>(self, terminal: T) -> Router
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        let mut next = Router::new().fallback_service(terminal);
        for resolver in self.resolvers.into_iter().rev() {
            let level = RedirectLayer::new(resolver).layer(next);
            next = Router::new().fallback_service(level);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TableResolver;
    use crate::source::PathRecord;
    use axum::body::Body;
    use axum::http::{header, StatusCode};

    fn terminal() -> Router {
        Router::new().fallback(|| async { "Hello, world!\n" })
    }

    fn request(path: &str) -> Request {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_chain_reaches_terminal() {
        let service = ResolverChain::default().into_service(terminal());
        let response = service.oneshot(request("/anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_first_source_wins() {
        let first = TableResolver::new("first", vec![PathRecord::new("/a", "https://one.example")]);
        let second = TableResolver::new("second", vec![PathRecord::new("/a", "https://two.example")])
            .with_status(StatusCode::PERMANENT_REDIRECT);
        let chain = ResolverChain::new(vec![
            Arc::new(first) as Arc<dyn Resolver>,
            Arc::new(second),
        ]);
        assert_eq!(chain.names(), vec!["first", "second"]);

        let response = chain.into_service(terminal()).oneshot(request("/a")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://one.example");
    }

    #[tokio::test]
    async fn test_invalid_location_falls_through() {
        let bad = TableResolver::new("bad", vec![PathRecord::new("/a", "https://x\r\n")]);
        let good = TableResolver::new("good", vec![PathRecord::new("/a", "https://good.example")]);
        let chain = ResolverChain::new(vec![Arc::new(bad) as Arc<dyn Resolver>, Arc::new(good)]);

        let response = chain.into_service(terminal()).oneshot(request("/a")).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "https://good.example");
    }

    #[tokio::test]
    async fn test_path_is_percent_decoded() {
        let table = TableResolver::new(
            "inline",
            vec![
                PathRecord::new("/with space", "https://example.com/space"),
                PathRecord::new("/café", "https://example.com/cafe"),
                PathRecord::new("/a/b", "https://example.com/ab"),
            ],
        );
        let service = ResolverChain::new(vec![Arc::new(table) as Arc<dyn Resolver>]).into_service(terminal());

        let response = service.clone().oneshot(request("/with%20space")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/space");

        let response = service.clone().oneshot(request("/caf%C3%A9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/cafe");

        let response = service.clone().oneshot(request("/a%2Fb")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        // Decoding is the only transformation applied.
        let response = service.clone().oneshot(request("/with%20space/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = service.clone().oneshot(request("/CAF%C3%A9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Invalid UTF-8 after decoding falls through.
        let response = service.oneshot(request("/caf%FF")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_request_path_decoding() {
        assert_eq!(request_path("/plain").as_deref(), Some("/plain"));
        assert_eq!(request_path("/with%20space").as_deref(), Some("/with space"));
        assert_eq!(request_path("/100%").as_deref(), Some("/100%"));
        assert_eq!(request_path("/%FF"), None);
    }

    #[test]
    fn test_chain_resolve_in_order() {
        let mut chain = ResolverChain::default();
        chain.push(Arc::new(TableResolver::new("a", vec![PathRecord::new("/x", "1")])));
        chain.push(Arc::new(TableResolver::new("b", vec![PathRecord::new("/x", "2"), PathRecord::new("/y", "3")])));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve("/x").unwrap().location, "1");
        assert_eq!(chain.resolve("/y").unwrap().location, "3");
        assert_eq!(chain.resolve("/z"), None);
    }
}
