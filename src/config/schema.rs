//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::observability::logging::DEFAULT_LOG_FILTER;
use crate::resolver::{STORE_REDIRECT_STATUS, TABLE_REDIRECT_STATUS};
use crate::source::{Encoding, PathRecord};

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Redirect sources, tried in the order listed.
    pub sources: Vec<SourceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on handling a single request.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// tracing-subscriber filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One redirect source in the chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceConfig {
    /// Label for logs and metrics. Derived from the kind and file when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Where the rules come from.
    #[serde(flatten)]
    pub kind: SourceKind,

    /// Redirect status override (3xx).
    #[serde(default)]
    pub status: Option<u16>,
}

/// Source type, decided once at configuration time.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceKind {
    /// Rules written directly in the config file.
    Inline { rules: Vec<PathRecord> },

    /// YAML rules file.
    Yaml { file: PathBuf },

    /// JSON rules file.
    Json { file: PathBuf },

    /// redb store file.
    Store { file: PathBuf },
}

impl SourceKind {
    /// Pick a source kind from a file extension.
    ///
    /// `.yaml`/`.yml` and `.json` are rule files, `.db`/`.redb` are stores.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file = path.to_path_buf();
        match Encoding::from_path(path) {
            Some(Encoding::Yaml) => Some(SourceKind::Yaml { file }),
            Some(Encoding::Json) => Some(SourceKind::Json { file }),
            None => match path.extension()?.to_str()? {
                "db" | "redb" => Some(SourceKind::Store { file }),
                _ => None,
            },
        }
    }

    /// Backing file, if any.
    pub fn file(&self) -> Option<&Path> {
        match self {
            SourceKind::Inline { .. } => None,
            SourceKind::Yaml { file } | SourceKind::Json { file } | SourceKind::Store { file } => {
                Some(file)
            }
        }
    }

    /// Redirect status used when a source does not override it.
    pub fn default_status(&self) -> StatusCode {
        match self {
            SourceKind::Store { .. } => STORE_REDIRECT_STATUS,
            _ => TABLE_REDIRECT_STATUS,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            SourceKind::Inline { .. } => "inline",
            SourceKind::Yaml { .. } => "yaml",
            SourceKind::Json { .. } => "json",
            SourceKind::Store { .. } => "store",
        }
    }
}

impl SourceConfig {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            name: None,
            kind,
            status: None,
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.kind.file() {
            Some(file) => format!("{}:{}", self.kind.tag(), file.display()),
            None => self.kind.tag().to_string(),
        }
    }

    /// Effective redirect status. Validation guarantees overrides are 3xx.
    pub fn redirect_status(&self) -> StatusCode {
        self.status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or_else(|| self.kind.default_status())
    }
}
