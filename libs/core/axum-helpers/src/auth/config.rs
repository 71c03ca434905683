//! JWT configuration loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_parse, env_required};

const MIN_SECRET_LEN: usize = 32;

/// Secrets and lifetimes for access and refresh tokens.
///
/// - `JWT_ACCESS_SECRET` (required, at least 32 characters)
/// - `JWT_REFRESH_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TTL_SECS` (default 900)
/// - `JWT_REFRESH_TTL_SECS` (default 2592000, 30 days)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    /// # Panics
    /// Panics if either secret is shorter than 32 characters.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();
        assert!(
            access_secret.len() >= MIN_SECRET_LEN && refresh_secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            access_secret,
            refresh_secret,
            access_ttl_secs: 900,
            refresh_ttl_secs: 2_592_000,
        }
    }

    pub fn with_ttls(mut self, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }
}

fn secret_from_env(key: &str) -> Result<String, ConfigError> {
    let secret = env_required(key)?;

    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!(
                "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }

    Ok(secret)
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_secret: secret_from_env("JWT_ACCESS_SECRET")?,
            refresh_secret: secret_from_env("JWT_REFRESH_SECRET")?,
            access_ttl_secs: env_parse("JWT_ACCESS_TTL_SECS", "900")?,
            refresh_ttl_secs: env_parse("JWT_REFRESH_TTL_SECS", "2592000")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS: &str = "this-is-a-valid-access-secret-32-chars!";
    const REFRESH: &str = "this-is-a-valid-refresh-secret-32-chars";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(ACCESS, REFRESH);
        assert_eq!(config.access_secret, ACCESS);
        assert_eq!(config.access_ttl_secs, 900);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new(ACCESS, "short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("JWT_ACCESS_SECRET", Some(ACCESS)),
                ("JWT_REFRESH_SECRET", Some(REFRESH)),
                ("JWT_ACCESS_TTL_SECS", Some("60")),
                ("JWT_REFRESH_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.refresh_secret, REFRESH);
                assert_eq!(config.access_ttl_secs, 60);
                assert_eq!(config.refresh_ttl_secs, 2_592_000);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_vars(
            [
                ("JWT_ACCESS_SECRET", Some(ACCESS)),
                ("JWT_REFRESH_SECRET", None),
            ],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_REFRESH_SECRET"));
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_vars(
            [
                ("JWT_ACCESS_SECRET", Some("short")),
                ("JWT_REFRESH_SECRET", Some(REFRESH)),
            ],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("32 characters"));
            },
        );
    }
}
