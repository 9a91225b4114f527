//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ServerConfig, SourceConfig, SourceKind};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Unsupported source file {0:?}: expected .yaml, .yml, .json, .db or .redb")]
    UnsupportedExtension(PathBuf),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Turn a bare file path into a source, dispatching on its extension.
pub fn source_from_path(path: &Path) -> Result<SourceConfig, ConfigError> {
    SourceKind::from_path(path)
        .map(SourceConfig::new)
        .ok_or_else(|| ConfigError::UnsupportedExtension(path.to_path_buf()))
}
