//! The resolution pipeline.
//!
//! Defaults, then the config file, then the environment, then validation.
//! Each call builds and owns a fresh tree; nothing is shared between calls.

use super::defaults::apply_defaults;
use super::env::{EnvSource, ProcessEnv, apply_environment};
use super::files::{SearchPaths, load_file};
use super::types::Config;
use super::validate::AuthMode;
use crate::error::ConfigResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration source layer, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Defaults = 0,
    File = 1,
    Environment = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::File => write!(f, "file"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: Config,
    pub auth_mode: AuthMode,
    /// The config file that was loaded, if any.
    pub source: Option<PathBuf>,
}

/// Resolves configuration from defaults, file and environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader<E = ProcessEnv> {
    search_paths: SearchPaths,
    env: E,
}

impl Default for ConfigLoader<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader<ProcessEnv> {
    /// Loader over the process environment and the standard search paths.
    pub fn new() -> Self {
        Self {
            search_paths: SearchPaths::default(),
            env: ProcessEnv,
        }
    }
}

impl<E: EnvSource> ConfigLoader<E> {
    /// Replace the environment source.
    pub fn with_env<F: EnvSource>(self, env: F) -> ConfigLoader<F> {
        ConfigLoader {
            search_paths: self.search_paths,
            env,
        }
    }

    /// Replace the locations probed when no explicit file is given.
    pub fn with_search_paths(mut self, search_paths: SearchPaths) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Run the pipeline. Returns the first error in pipeline order.
    pub fn load(&self, config_path: Option<&Path>) -> ConfigResult<Resolved> {
        let mut config = Config::default();

        apply_defaults(&mut config)?;
        debug!(tier = %ConfigTier::Defaults, "Applied config tier");

        let source = load_file(&mut config, config_path, &self.search_paths)?;
        debug!(tier = %ConfigTier::File, loaded = source.is_some(), "Applied config tier");

        apply_environment(&mut config, &self.env)?;
        debug!(tier = %ConfigTier::Environment, "Applied config tier");

        let auth_mode = config.validate()?;
        debug!(%auth_mode, "Configuration validated");

        Ok(Resolved {
            config,
            auth_mode,
            source,
        })
    }
}

/// Resolve configuration from the process environment and standard paths.
///
/// `config_path` names an explicit file; `None` or an empty path probes the
/// standard locations.
pub fn resolve(config_path: Option<&Path>) -> ConfigResult<Config> {
    ConfigLoader::new()
        .load(config_path)
        .map(|resolved| resolved.config)
}
