//! Path resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → chain.rs (outermost RedirectService)
//!     → Resolver::resolve(path)
//!         Some(Redirect) → 302/308 + Location
//!         None           → next handler in the chain
//!     → ... → terminal handler
//! ```
//!
//! # Design Decisions
//! - Resolvers never fail at request time: a miss and a lookup failure
//!   both fall through to the next handler
//! - Redirect status is chosen per source, not globally
//! - Chain order is exactly the order sources were configured

pub mod chain;
pub mod store;
pub mod table;

use axum::http::{header, HeaderValue, StatusCode};
use axum::http::header::InvalidHeaderValue;
use axum::response::{IntoResponse, Response};

pub use chain::{RedirectLayer, RedirectService, ResolverChain};
pub use store::StoreResolver;
pub use table::TableResolver;

/// Default status for inline and file-backed sources.
pub const TABLE_REDIRECT_STATUS: StatusCode = StatusCode::FOUND;

/// Default status for store-backed sources.
pub const STORE_REDIRECT_STATUS: StatusCode = StatusCode::PERMANENT_REDIRECT;

/// A single redirect source.
pub trait Resolver: Send + Sync + std::fmt::Debug {
    /// Label used in logs and metrics.
    fn name(&self) -> &str;

    /// Resolve a request path to a redirect, or `None` to defer to the next handler.
    fn resolve(&self, path: &str) -> Option<Redirect>;
}

/// Outcome of a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub status: StatusCode,
}

impl Redirect {
    pub fn new(location: impl Into<String>, status: StatusCode) -> Self {
        Self {
            location: location.into(),
            status,
        }
    }

    /// Build the HTTP response. Fails if the location is not a valid header value.
    pub fn try_into_response(self) -> Result<Response, InvalidHeaderValue> {
        let location = HeaderValue::try_from(self.location)?;
        Ok((self.status, [(header::LOCATION, location)]).into_response())
    }
}
