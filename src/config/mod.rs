//! Layered configuration for the portal API.
//!
//! A [`Config`] is resolved from three sources, lowest precedence first:
//! 1. **Defaults** - the default literal of each leaf in [`schema::FIELDS`]
//! 2. **File** - an optional YAML file, explicit or found on [`SearchPaths`]
//! 3. **Environment** - one variable per leaf, e.g. `SERVER_PORT`
//!
//! The result is then validated. Authentication rules only apply when an
//! OAuth client id or a JWT private key path is configured.
//!
//! ## Secrets
//! Secret leaves (OAuth credentials, key paths, the Valkey password) are read
//! from the environment only. They are ignored in config files, never written
//! by [`generate_default_config`], and masked by [`render`] unless asked not to.

pub mod coerce;
pub mod defaults;
pub mod display;
pub mod env;
pub mod files;
pub mod loader;
pub mod schema;
mod types;
pub mod validate;

pub use coerce::{ConversionError, FieldKind, Value, format_duration, parse_duration};
pub use display::{generate_default_config, mask, render, render_sample};
pub use env::{EnvSource, ProcessEnv};
pub use files::{SYSTEM_CONFIG_PATH, SearchPaths};
pub use loader::{ConfigLoader, ConfigTier, Resolved, resolve};
pub use schema::{FieldDescriptor, SchemaError, verify_schema};
pub use types::*;
pub use validate::{AuthMode, ValidationError, ValidationRule};
