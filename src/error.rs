//! Error types for configuration resolution.

use crate::config::ConversionError;
use crate::config::validate::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a config file could not be parsed.
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error("malformed YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("top-level document must be a mapping")]
    NotAMapping,

    #[error("invalid value for {path}: {source}")]
    Field {
        path: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("{path} must be a scalar")]
    NotAScalar { path: &'static str },
}

/// A failure in one stage of configuration resolution.
///
/// Each variant wraps the underlying cause with the leaf path, environment
/// variable or file path it concerns.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to apply default value for {path}")]
    DefaultApply {
        path: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("failed to read config file: {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: ParseCause,
    },

    #[error("failed to apply environment variable {env_key} to {path}")]
    EnvApply {
        path: &'static str,
        env_key: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("config validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to render config")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to write config file: {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// The conversion failure at the root of this error, if any.
    pub fn conversion(&self) -> Option<&ConversionError> {
        match self {
            ConfigError::DefaultApply { source, .. } | ConfigError::EnvApply { source, .. } => {
                Some(source)
            }
            ConfigError::FileParse {
                source: ParseCause::Field { source, .. },
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
