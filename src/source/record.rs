//! Redirect rule records and their on-disk encodings.
//!
//! # Formats
//! ```text
//! YAML:
//!   - path: /some-path
//!     url: https://www.some-url.com/demo
//!
//! JSON:
//!   [ { "path": "/some-path", "url": "https://www.some-url.com/demo" } ]
//! ```
//!
//! # Design Decisions
//! - Decoding is all-or-nothing: a malformed document never yields records
//! - Both encodings share one record schema; unknown fields are ignored
//! - Record order is preserved exactly as written

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One declared redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathRecord {
    /// Request path to match (exact, case-sensitive).
    pub path: String,

    /// Destination URL sent back in the `Location` header.
    pub url: String,
}

impl PathRecord {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Supported rule file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Yaml,
    Json,
}

impl Encoding {
    /// Pick an encoding from a file extension (`.yaml`, `.yml`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Encoding::Yaml),
            "json" => Some(Encoding::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Yaml => write!(f, "yaml"),
            Encoding::Json => write!(f, "json"),
        }
    }
}

/// Error raised when rule bytes cannot be parsed or serialized.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid YAML rules: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON rules: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode raw bytes into an ordered list of records.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<Vec<PathRecord>, DecodeError> {
    match encoding {
        Encoding::Yaml => {
            // A file with nothing but comments is a valid, empty rule set.
            if is_blank_yaml(bytes) {
                return Ok(Vec::new());
            }
            Ok(serde_yaml::from_slice(bytes)?)
        }
        Encoding::Json => Ok(serde_json::from_slice(bytes)?),
    }
}

/// Serialize records in the given encoding.
pub fn encode(records: &[PathRecord], encoding: Encoding) -> Result<String, DecodeError> {
    match encoding {
        Encoding::Yaml => Ok(serde_yaml::to_string(records)?),
        Encoding::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn is_blank_yaml(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(bytes).lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}
