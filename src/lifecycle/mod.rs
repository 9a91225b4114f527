//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → metrics exporter → read/decode/open sources → ResolverChain
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C / SIGTERM → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then sources, then the listener
//! - Store handles live until the server future returns

pub mod shutdown;
pub mod startup;

pub use shutdown::shutdown_signal;
pub use startup::{build_chain, build_resolver, start, StartupError};
