//! Highest-precedence layer: environment variables.

use super::coerce::ConversionError;
use super::schema::FIELDS;
use super::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::env::VarError;
use tracing::debug;

/// A source of environment variables.
///
/// Resolution reads the environment only through this trait, so tests and
/// embedders can supply a fixed map instead of touching the process. Lookups
/// report the same outcomes as [`std::env::var`].
pub trait EnvSource {
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.get(key).cloned().ok_or(VarError::NotPresent)
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.get(key)
            .map(|v| v.to_string())
            .ok_or(VarError::NotPresent)
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, key: &str) -> Result<String, VarError> {
        (**self).var(key)
    }
}

/// Overwrite leaves from their environment variables.
///
/// An unset or empty variable counts as not provided and leaves the leaf
/// unchanged. A value that is not valid Unicode, or that fails to coerce,
/// stops resolution.
pub fn apply_environment(config: &mut Config, env: &impl EnvSource) -> ConfigResult<()> {
    for field in FIELDS {
        let Some(env_key) = field.env_key else {
            continue;
        };
        let applied = match env.var(env_key) {
            Err(VarError::NotPresent) => continue,
            Ok(value) if value.is_empty() => continue,
            Ok(value) => field.assign(config, &value),
            Err(VarError::NotUnicode(raw)) => Err(ConversionError::new(
                field.kind(),
                &raw.to_string_lossy(),
                "value is not valid unicode",
            )),
        };
        applied.map_err(|source| ConfigError::EnvApply {
            path: field.path,
            env_key,
            source,
        })?;
        debug!(path = field.path, env_key, "Applied environment override");
    }
    Ok(())
}
