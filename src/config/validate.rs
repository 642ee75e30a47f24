//! Two-tier validation.
//!
//! The basic tier always runs. When authentication is configured the auth tier
//! runs as well, after the basic rules pass.

use super::types::Config;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Environment variables that must be set once authentication is enabled.
pub const AUTH_REQUIRED_ENV_KEYS: [&str; 4] = [
    "GITHUB_CLIENT_ID",
    "GITHUB_CLIENT_SECRET",
    "JWT_PRIVATE_KEY_PATH",
    "JWT_PUBLIC_KEY_PATH",
];

/// Whether the authentication feature is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    Disabled,
    Enabled,
}

impl AuthMode {
    /// Auth is enabled as soon as an OAuth client id or a JWT signing key is set.
    pub fn of(config: &Config) -> Self {
        if config.is_auth_enabled() {
            AuthMode::Enabled
        } else {
            AuthMode::Disabled
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Disabled => write!(f, "disabled"),
            AuthMode::Enabled => write!(f, "enabled"),
        }
    }
}

/// A named validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    PortalNameRequired,
    ServerPortRange,
    GithubClientIdRequired,
    GithubClientSecretRequired,
    JwtPrivateKeyPathRequired,
    JwtPublicKeyPathRequired,
    JwtPrivateKeyExists,
    JwtPublicKeyExists,
}

impl ValidationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::PortalNameRequired => "portal_name_required",
            ValidationRule::ServerPortRange => "server_port_range",
            ValidationRule::GithubClientIdRequired => "github_client_id_required",
            ValidationRule::GithubClientSecretRequired => "github_client_secret_required",
            ValidationRule::JwtPrivateKeyPathRequired => "jwt_private_key_path_required",
            ValidationRule::JwtPublicKeyPathRequired => "jwt_public_key_path_required",
            ValidationRule::JwtPrivateKeyExists => "jwt_private_key_exists",
            ValidationRule::JwtPublicKeyExists => "jwt_public_key_exists",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule a configuration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} [{rule}]")]
pub struct ValidationError {
    pub rule: ValidationRule,
    pub message: String,
}

impl ValidationError {
    fn new(rule: ValidationRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl Config {
    /// OAuth client id or JWT private key path is set.
    pub fn is_auth_enabled(&self) -> bool {
        !self.auth.github.oauth.client_id.is_empty() || !self.auth.jwt.private_key_path.is_empty()
    }

    pub fn auth_mode(&self) -> AuthMode {
        AuthMode::of(self)
    }

    /// Check the configuration against the rules for its auth mode.
    pub fn validate(&self) -> Result<AuthMode, ValidationError> {
        let mode = AuthMode::of(self);
        match mode {
            AuthMode::Disabled => self.validate_basic()?,
            AuthMode::Enabled => self.validate_auth()?,
        }
        Ok(mode)
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.portal_name.is_empty() {
            return Err(ValidationError::new(
                ValidationRule::PortalNameRequired,
                "PORTAL_NAME is required",
            ));
        }
        if !(1..=65535).contains(&self.server.port) {
            return Err(ValidationError::new(
                ValidationRule::ServerPortRange,
                format!(
                    "server port must be between 1 and 65535, got {}",
                    self.server.port
                ),
            ));
        }
        Ok(())
    }

    fn validate_auth(&self) -> Result<(), ValidationError> {
        self.validate_basic()?;

        let oauth = &self.auth.github.oauth;
        let jwt = &self.auth.jwt;
        let required = [
            (&oauth.client_id, ValidationRule::GithubClientIdRequired),
            (&oauth.client_secret, ValidationRule::GithubClientSecretRequired),
            (&jwt.private_key_path, ValidationRule::JwtPrivateKeyPathRequired),
            (&jwt.public_key_path, ValidationRule::JwtPublicKeyPathRequired),
        ];
        for ((value, rule), env_key) in required.into_iter().zip(AUTH_REQUIRED_ENV_KEYS) {
            if value.is_empty() {
                return Err(ValidationError::new(
                    rule,
                    format!("{env_key} is required for authentication"),
                ));
            }
        }

        if is_missing(&jwt.private_key_path) {
            return Err(ValidationError::new(
                ValidationRule::JwtPrivateKeyExists,
                format!("JWT private key file not found: {}", jwt.private_key_path),
            ));
        }
        if is_missing(&jwt.public_key_path) {
            return Err(ValidationError::new(
                ValidationRule::JwtPublicKeyExists,
                format!("JWT public key file not found: {}", jwt.public_key_path),
            ));
        }
        Ok(())
    }
}

/// Only a definite "not found" counts as missing; other I/O errors pass.
fn is_missing(path: &str) -> bool {
    matches!(
        std::fs::metadata(Path::new(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound
    )
}
