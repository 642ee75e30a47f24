//! Configuration tree types.
//!
//! The tree is a plain, fixed-shape record. It carries no serde derives: every
//! source layer reaches the leaves through the descriptor table in
//! [`super::schema`], so the shape here and the table there are the only two
//! places a leaf is declared.

use chrono::TimeDelta;

/// Fully resolved portal configuration.
///
/// `Config::default()` is the all-zero tree that the resolution pipeline
/// starts from; it is not a usable configuration until defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Display name of the portal.
    pub portal_name: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen port, valid range 1..=65535.
    pub port: i64,
    /// One of debug, info, warn, error.
    pub log_level: String,
}

/// Authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub github: GitHubConfig,
    pub jwt: JwtConfig,
    pub valkey: ValkeyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubConfig {
    pub oauth: GitHubOAuthConfig,
    pub app: GitHubAppConfig,
}

/// GitHub OAuth application credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// GitHub App credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubAppConfig {
    pub app_id: String,
    pub private_key_path: String,
}

/// JWT signing keys and token lifetimes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub private_key_path: String,
    pub public_key_path: String,
    pub access_token_duration: TimeDelta,
    pub refresh_token_duration: TimeDelta,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_path: String::new(),
            public_key_path: String::new(),
            access_token_duration: TimeDelta::zero(),
            refresh_token_duration: TimeDelta::zero(),
        }
    }
}

/// Session store connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValkeyConfig {
    pub address: String,
    pub password: String,
    pub db: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}
