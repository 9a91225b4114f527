//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, redirect statuses are 3xx)
//! - Check sources are usable before any file is touched
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ServerConfig, SourceConfig, SourceKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("source {source_name}: status {status} is not a redirect (3xx)")]
    InvalidStatus { source_name: String, status: u16 },

    #[error("source {source_name}: file path is empty")]
    EmptyFile { source_name: String },

    #[error("source {source_name}: rule #{index} has an empty path")]
    EmptyRulePath { source_name: String, index: usize },
}

/// Validate the whole configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    for source in &config.sources {
        validate_source(source, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_source(source: &SourceConfig, errors: &mut Vec<ValidationError>) {
    let source_name = source.label();

    if let Some(status) = source.status {
        if !(300..=399).contains(&status) {
            errors.push(ValidationError::InvalidStatus {
                source_name: source_name.clone(),
                status,
            });
        }
    }

    match &source.kind {
        SourceKind::Inline { rules } => {
            for (index, rule) in rules.iter().enumerate() {
                if rule.path.is_empty() {
                    errors.push(ValidationError::EmptyRulePath {
                        source_name: source_name.clone(),
                        index,
                    });
                }
            }
        }
        SourceKind::Yaml { file } | SourceKind::Json { file } | SourceKind::Store { file } => {
            if file.as_os_str().is_empty() {
                errors.push(ValidationError::EmptyFile { source_name });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PathRecord;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;

        let mut inline = SourceConfig::new(SourceKind::Inline {
            rules: vec![PathRecord::new("/ok", "https://example.com"), PathRecord::new("", "x")],
        });
        inline.status = Some(200);
        config.sources.push(inline);
        config.sources.push(SourceConfig::new(SourceKind::Json { file: "".into() }));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not-an-address".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::InvalidStatus { source_name: "inline".into(), status: 200 },
                ValidationError::EmptyRulePath { source_name: "inline".into(), index: 1 },
                ValidationError::EmptyFile { source_name: "json:".into() },
            ]
        );
    }

    #[test]
    fn test_redirect_statuses_accepted() {
        let mut config = ServerConfig::default();
        for status in [301, 302, 307, 308] {
            let mut source = SourceConfig::new(SourceKind::Store { file: "paths.db".into() });
            source.status = Some(status);
            config.sources.push(source);
        }
        assert!(validate_config(&config).is_ok());
    }
}
