//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → resolver chain (redirect or fall through)
//!     → fallback handler when no source matches
//!     → Send to client
//! ```

pub mod server;

pub use server::{default_fallback, HttpServer};
