//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver chain, startup, server
//!     → logging.rs (tracing events, filtered by EnvFilter)
//!     → metrics.rs (counters and gauges, Prometheus exporter)
//! ```

pub mod logging;
pub mod metrics;
