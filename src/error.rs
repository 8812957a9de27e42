//! Library error types
//!
//! The frame loop never returns these; content failures are logged and
//! turned into an empty gallery, config failures keep the previous config.

use std::path::PathBuf;

/// Failure resolving a catalog or a gallery manifest
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid gallery folder '{0}'")]
    InvalidFolder(String),

    #[error("gallery '{0}' not found")]
    NotFound(String),
}

/// A configuration value outside its allowed range
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid config value {field} = {value}: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl ConfigError {
    pub fn new(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
