//! Lowest-precedence layer: descriptor defaults.

use super::schema::{FIELDS, FieldDescriptor};
use super::types::Config;
use crate::error::{ConfigError, ConfigResult};

/// Fill every zero-valued leaf that declares a default.
///
/// Leaves that already hold a non-zero value are left alone, so the call is
/// idempotent. Stops at the first default that fails to coerce.
pub fn apply_defaults(config: &mut Config) -> ConfigResult<()> {
    apply_defaults_with(config, FIELDS)
}

pub(crate) fn apply_defaults_with(config: &mut Config, fields: &[FieldDescriptor]) -> ConfigResult<()> {
    for field in fields {
        let Some(literal) = field.default else {
            continue;
        };
        if !field.is_zero(config) {
            continue;
        }
        field
            .assign(config, literal)
            .map_err(|source| ConfigError::DefaultApply {
                path: field.path,
                source,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::descriptor;
    use chrono::TimeDelta;

    #[test]
    fn test_defaults_on_empty_tree() {
        let mut config = Config::default();
        apply_defaults(&mut config).unwrap();

        assert_eq!(config.portal_name, "TACOKUMO Portal");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.auth.github.oauth.redirect_url, "http://localhost:8080/callback");
        assert_eq!(config.auth.valkey.address, "localhost:6379");
        assert_eq!(config.auth.valkey.db, 0);
        assert_eq!(config.auth.jwt.access_token_duration, TimeDelta::hours(1));
        assert_eq!(config.auth.jwt.refresh_token_duration, TimeDelta::hours(8));
        assert!(config.auth.github.oauth.client_id.is_empty());
        assert!(config.security.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_existing_values_are_kept() {
        let mut config = Config::default();
        config.portal_name = "既存のポータル名".to_string();
        config.server.port = 9000;
        config.server.log_level = "debug".to_string();
        apply_defaults(&mut config).unwrap();

        assert_eq!(config.portal_name, "既存のポータル名");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.auth.valkey.address, "localhost:6379");
    }

    #[test]
    fn test_idempotent() {
        let mut once = Config::default();
        apply_defaults(&mut once).unwrap();
        let mut twice = once.clone();
        apply_defaults(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bad_default_stops_the_stage() {
        let fields = [
            descriptor!(Integer(i64) server.port,
                default: Some("eighty"), env: None, secret: false),
            descriptor!(String(String) server.log_level,
                default: Some("info"), env: None, secret: false),
        ];
        let mut config = Config::default();
        let err = apply_defaults_with(&mut config, &fields).unwrap_err();

        match err {
            ConfigError::DefaultApply { path, source } => {
                assert_eq!(path, "server.port");
                assert_eq!(source.literal, "eighty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(config.server.log_level.is_empty());
    }
}
