//! HTTP server setup.
//!
//! # Responsibilities
//! - Compose the resolver chain around the fallback handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener and shut down gracefully

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tower::Service;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::resolver::ResolverChain;

/// HTTP server for the redirect service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that tries `chain` and answers with `fallback` on a miss.
    pub fn new<T>(config: &ServerConfig, chain: ResolverChain, fallback: T) -> Self
    where
        T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        T::Response: IntoResponse,
        T::Future: Send + 'static,
    {
        let router = Self::build_router(config, chain.into_service(fallback));
        Self { router }
    }

    /// Wrap the composed chain with middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, chain: Router) -> Router {
        chain
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The composed router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `signal` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Handler used when no source matches: greets every path.
pub fn default_fallback() -> Router {
    Router::new().fallback(hello)
}

async fn hello() -> &'static str {
    "Hello, world!\n"
}
