//! Redirect lookup service library.
//!
//! Resolves request paths to destination URLs through an ordered chain of
//! sources (inline rules, YAML/JSON rule files, a redb store) and falls
//! back to a caller-supplied handler when nothing matches.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolver;
pub mod source;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use resolver::{Redirect, Resolver, ResolverChain};
pub use source::PathRecord;
