//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics exporter before any source loads
//! - Read and decode rule files, open stores
//! - Build one resolver per configured source, in configured order
//! - Abort on the first unusable source
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Sources initialize in order, not concurrently
//! - Store handles are opened here and shared with their resolver

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::{ServerConfig, SourceConfig, SourceKind};
use crate::observability::metrics;
use crate::resolver::{Resolver, ResolverChain, StoreResolver, TableResolver};
use crate::source::{self, store, DecodeError, Encoding, PathRecord, StoreError};

/// Error raised while turning configuration into a resolver chain.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read {path}: {error}")]
    Read {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to decode {path}: {error}")]
    Decode {
        path: PathBuf,
        #[source]
        error: DecodeError,
    },

    #[error("failed to open store {path}: {error}")]
    Store {
        path: PathBuf,
        #[source]
        error: StoreError,
    },
}

/// Start observability, then build the chain.
///
/// The metrics exporter is installed first so gauges recorded while
/// sources load reach it.
pub fn start(config: &ServerConfig) -> Result<ResolverChain, StartupError> {
    if config.observability.metrics_enabled {
        // Validated as a socket address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }
    build_chain(config)
}

/// Build the resolver chain for every source in `config`.
pub fn build_chain(config: &ServerConfig) -> Result<ResolverChain, StartupError> {
    let mut chain = ResolverChain::default();
    for source in &config.sources {
        chain.push(build_resolver(source)?);
    }

    if chain.is_empty() {
        tracing::warn!("No redirect sources configured, every request reaches the fallback handler");
    } else {
        tracing::info!(sources = ?chain.names(), "Resolver chain built");
    }
    Ok(chain)
}

/// Build the resolver for a single source.
pub fn build_resolver(source: &SourceConfig) -> Result<Arc<dyn Resolver>, StartupError> {
    let name = source.label();
    let status = source.redirect_status();

    let resolver: Arc<dyn Resolver> = match &source.kind {
        SourceKind::Inline { rules } => {
            Arc::new(table_resolver(&name, rules.clone()).with_status(status))
        }
        SourceKind::Yaml { file } => {
            let rules = read_rules(file, Encoding::Yaml)?;
            Arc::new(table_resolver(&name, rules).with_status(status))
        }
        SourceKind::Json { file } => {
            let rules = read_rules(file, Encoding::Json)?;
            Arc::new(table_resolver(&name, rules).with_status(status))
        }
        SourceKind::Store { file } => {
            let db = store::open(file).map_err(|error| StartupError::Store {
                path: file.clone(),
                error,
            })?;
            tracing::info!(source = %name, status = status.as_u16(), "Store opened");
            Arc::new(StoreResolver::new(name, Arc::new(db)).with_status(status))
        }
    };
    Ok(resolver)
}

fn table_resolver(name: &str, rules: Vec<PathRecord>) -> TableResolver {
    let resolver = TableResolver::new(name, rules);
    tracing::info!(source = %name, rules = resolver.len(), "Rules loaded");
    metrics::record_rules_loaded(name, resolver.len());
    resolver
}

fn read_rules(path: &Path, encoding: Encoding) -> Result<Vec<PathRecord>, StartupError> {
    let bytes = fs::read(path).map_err(|error| StartupError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    source::decode(&bytes, encoding).map_err(|error| StartupError::Decode {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_chain_follows_config_order() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("paths.yaml");
        fs::write(&yaml, "- path: /a\n  url: https://yaml.example/a\n").unwrap();
        let json = dir.path().join("paths.json");
        fs::write(&json, r#"[{"path": "/b", "url": "https://json.example/b"}]"#).unwrap();

        let mut config = ServerConfig::default();
        let mut defaults = SourceConfig::new(SourceKind::Inline {
            rules: vec![PathRecord::new("/a", "https://inline.example/a")],
        });
        defaults.name = Some("defaults".into());
        config.sources.push(defaults);
        config.sources.push(SourceConfig::new(SourceKind::Yaml { file: yaml }));
        config.sources.push(SourceConfig::new(SourceKind::Json { file: json }));

        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.names()[0], "defaults");
        assert_eq!(chain.resolve("/a").unwrap().location, "https://inline.example/a");
        let b = chain.resolve("/b").unwrap();
        assert_eq!(b.location, "https://json.example/b");
        assert_eq!(b.status, StatusCode::FOUND);
    }

    #[test]
    fn test_malformed_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("paths.json");
        fs::write(&json, r#"[{"path": "/b""#).unwrap();

        let mut config = ServerConfig::default();
        config.sources.push(SourceConfig::new(SourceKind::Json { file: json }));

        assert!(matches!(
            build_chain(&config),
            Err(StartupError::Decode { error: DecodeError::Json(_), .. })
        ));
    }

    #[test]
    fn test_missing_files_abort() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = SourceConfig::new(SourceKind::Yaml { file: dir.path().join("nope.yaml") });
        assert!(matches!(build_resolver(&yaml), Err(StartupError::Read { .. })));

        let store = SourceConfig::new(SourceKind::Store { file: dir.path().join("nope.db") });
        assert!(matches!(build_resolver(&store), Err(StartupError::Store { .. })));
    }

    #[test]
    fn test_store_source_uses_permanent_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.db");
        let db = store::create(&file).unwrap();
        store::import(&db, &[PathRecord::new("/bolt-godoc", "https://example.com/godoc")]).unwrap();
        drop(db);

        let resolver = build_resolver(&SourceConfig::new(SourceKind::Store { file })).unwrap();
        let redirect = resolver.resolve("/bolt-godoc").unwrap();
        assert_eq!(redirect.status, StatusCode::PERMANENT_REDIRECT);
    }
}
