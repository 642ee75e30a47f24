//! Static descriptor table for every configuration leaf.
//!
//! Each [`FieldDescriptor`] names one leaf of [`Config`] by dotted path and
//! carries its sourcing rules: default literal, environment variable, list
//! separator and the `secret`/`serializable` flags. The descriptor also holds a
//! typed accessor into the tree, so the generic source layers can read and
//! write any leaf without knowing the struct layout.

use super::coerce::{ConversionError, FieldKind, Value, coerce};
use super::types::Config;
use chrono::TimeDelta;
use std::collections::HashSet;
use thiserror::Error;

/// Separator used by string-list leaves unless a descriptor overrides it.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Borrowing accessors for one leaf of type `T`.
pub struct Accessor<T: 'static> {
    pub get: fn(&Config) -> &T,
    pub get_mut: fn(&mut Config) -> &mut T,
}

/// A typed handle on a leaf. The variant fixes the leaf's kind.
pub enum Slot {
    String(Accessor<String>),
    Integer(Accessor<i64>),
    Duration(Accessor<TimeDelta>),
    Boolean(Accessor<bool>),
    StringList(Accessor<Vec<String>>),
}

/// Immutable metadata for one configuration leaf.
pub struct FieldDescriptor {
    /// Dotted path, e.g. `auth.jwt.access_token_duration`.
    pub path: &'static str,
    pub slot: Slot,
    pub default: Option<&'static str>,
    pub env_key: Option<&'static str>,
    /// Only meaningful for string-list leaves.
    pub separator: &'static str,
    /// Redacted on display.
    pub secret: bool,
    /// Read from and written to the YAML config file.
    pub serializable: bool,
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        match self.slot {
            Slot::String(_) => FieldKind::String,
            Slot::Integer(_) => FieldKind::Integer,
            Slot::Duration(_) => FieldKind::Duration,
            Slot::Boolean(_) => FieldKind::Boolean,
            Slot::StringList(_) => FieldKind::StringList {
                separator: self.separator,
            },
        }
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('.')
    }

    /// Clone the leaf's current value out of `config`.
    pub fn read(&self, config: &Config) -> Value {
        match &self.slot {
            Slot::String(a) => Value::String((a.get)(config).clone()),
            Slot::Integer(a) => Value::Integer(*(a.get)(config)),
            Slot::Duration(a) => Value::Duration(*(a.get)(config)),
            Slot::Boolean(a) => Value::Boolean(*(a.get)(config)),
            Slot::StringList(a) => Value::StringList((a.get)(config).clone()),
        }
    }

    /// Whether the leaf currently holds the zero value of its kind.
    pub fn is_zero(&self, config: &Config) -> bool {
        self.read(config).is_zero()
    }

    /// Overwrite the leaf with `value`.
    ///
    /// Fails when `value` is of a different kind than the leaf.
    pub fn write(&self, config: &mut Config, value: Value) -> Result<(), ConversionError> {
        match (&self.slot, value) {
            (Slot::String(a), Value::String(v)) => *(a.get_mut)(config) = v,
            (Slot::Integer(a), Value::Integer(v)) => *(a.get_mut)(config) = v,
            (Slot::Duration(a), Value::Duration(v)) => *(a.get_mut)(config) = v,
            (Slot::Boolean(a), Value::Boolean(v)) => *(a.get_mut)(config) = v,
            (Slot::StringList(a), Value::StringList(v)) => *(a.get_mut)(config) = v,
            (_, other) => {
                return Err(ConversionError::new(
                    self.kind(),
                    &format!("{other:?}"),
                    "value kind does not match field",
                ));
            }
        }
        Ok(())
    }

    /// Coerce `literal` under this leaf's kind and store it.
    pub fn assign(&self, config: &mut Config, literal: &str) -> Result<(), ConversionError> {
        let value = coerce(self.kind(), literal)?;
        self.write(config, value)
    }
}

macro_rules! slot {
    ($variant:ident, $ty:ty, $first:ident $(. $rest:ident)*) => {{
        fn get(config: &$crate::config::Config) -> &$ty {
            &config.$first $(.$rest)*
        }
        fn get_mut(config: &mut $crate::config::Config) -> &mut $ty {
            &mut config.$first $(.$rest)*
        }
        $crate::config::schema::Slot::$variant($crate::config::schema::Accessor { get, get_mut })
    }};
}

macro_rules! descriptor {
    (
        $variant:ident($ty:ty) $first:ident $(. $rest:ident)*,
        default: $default:expr,
        env: $env:expr,
        secret: $secret:expr $(,)?
    ) => {
        $crate::config::schema::FieldDescriptor {
            path: concat!(stringify!($first) $(, ".", stringify!($rest))*),
            slot: $crate::config::schema::slot!($variant, $ty, $first $(. $rest)*),
            default: $default,
            env_key: $env,
            separator: $crate::config::schema::DEFAULT_SEPARATOR,
            secret: $secret,
            serializable: !$secret,
        }
    };
}

pub(crate) use {descriptor, slot};

/// Every leaf of [`Config`], in display order.
pub static FIELDS: &[FieldDescriptor] = &[
    descriptor!(String(String) portal_name,
        default: Some("TACOKUMO Portal"), env: Some("PORTAL_NAME"), secret: false),
    descriptor!(Integer(i64) server.port,
        default: Some("8080"), env: Some("SERVER_PORT"), secret: false),
    descriptor!(String(String) server.log_level,
        default: Some("info"), env: Some("LOG_LEVEL"), secret: false),
    descriptor!(String(String) auth.github.oauth.client_id,
        default: None, env: Some("GITHUB_CLIENT_ID"), secret: true),
    descriptor!(String(String) auth.github.oauth.client_secret,
        default: None, env: Some("GITHUB_CLIENT_SECRET"), secret: true),
    descriptor!(String(String) auth.github.oauth.redirect_url,
        default: Some("http://localhost:8080/callback"),
        env: Some("GITHUB_OAUTH_REDIRECT_URL"), secret: false),
    descriptor!(String(String) auth.github.app.app_id,
        default: None, env: Some("GITHUB_APP_ID"), secret: true),
    descriptor!(String(String) auth.github.app.private_key_path,
        default: None, env: Some("GITHUB_APP_PRIVATE_KEY_PATH"), secret: true),
    descriptor!(String(String) auth.jwt.private_key_path,
        default: None, env: Some("JWT_PRIVATE_KEY_PATH"), secret: true),
    descriptor!(String(String) auth.jwt.public_key_path,
        default: None, env: Some("JWT_PUBLIC_KEY_PATH"), secret: true),
    descriptor!(Duration(TimeDelta) auth.jwt.access_token_duration,
        default: Some("1h"), env: Some("JWT_ACCESS_TOKEN_DURATION"), secret: false),
    descriptor!(Duration(TimeDelta) auth.jwt.refresh_token_duration,
        default: Some("8h"), env: Some("JWT_REFRESH_TOKEN_DURATION"), secret: false),
    descriptor!(String(String) auth.valkey.address,
        default: Some("localhost:6379"), env: Some("VALKEY_ADDRESS"), secret: false),
    descriptor!(String(String) auth.valkey.password,
        default: None, env: Some("VALKEY_PASSWORD"), secret: true),
    descriptor!(Integer(i64) auth.valkey.db,
        default: Some("0"), env: Some("VALKEY_DB"), secret: false),
    descriptor!(StringList(Vec<String>) security.cors.allowed_origins,
        default: None, env: Some("CORS_ALLOWED_ORIGINS"), secret: false),
];

/// Look up a descriptor by dotted path.
pub fn field(path: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.path == path)
}

/// Environment variables that carry secret leaves.
pub fn secret_env_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().filter(|f| f.secret).filter_map(|f| f.env_key)
}

/// A structural problem in the descriptor table.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate field path: {0}")]
    DuplicatePath(&'static str),

    #[error("secret field {0} must be a string")]
    SecretNotString(&'static str),

    #[error("field {path} is both a parent and a leaf")]
    PathConflict { path: &'static str },

    #[error("invalid default for {path}: {source}")]
    InvalidDefault {
        path: &'static str,
        #[source]
        source: ConversionError,
    },
}

/// Check the descriptor table's invariants.
///
/// Run once at process start; the table is static, so a pass here holds for
/// every later resolution.
pub fn verify_schema() -> Result<(), SchemaError> {
    verify_fields(FIELDS)
}

pub(crate) fn verify_fields(fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for f in fields {
        if !seen.insert(f.path) {
            return Err(SchemaError::DuplicatePath(f.path));
        }
        if f.secret && !matches!(f.slot, Slot::String(_)) {
            return Err(SchemaError::SecretNotString(f.path));
        }
        if let Some(literal) = f.default {
            coerce(f.kind(), literal).map_err(|source| SchemaError::InvalidDefault {
                path: f.path,
                source,
            })?;
        }
    }
    for f in fields {
        let prefix = format!("{}.", f.path);
        if fields.iter().any(|other| other.path.starts_with(&prefix)) {
            return Err(SchemaError::PathConflict { path: f.path });
        }
    }
    Ok(())
}
