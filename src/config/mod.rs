//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)          --path <file> flags
//!     → loader.rs (parse)         → loader.rs (extension → SourceKind)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → lifecycle::startup builds the resolver chain from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, source_from_path, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, ServerConfig, SourceConfig, SourceKind, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
