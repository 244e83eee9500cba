use std::env;
use std::fmt;

use crate::{ConfigError, Lookup, parse_var};

/// Development signing secret. Override `JWT_SECRET` in every deployed environment.
pub const DEFAULT_JWT_SECRET: &str =
    "MySecretKeyForJWTTokenGenerationThatShouldBeAtLeast256BitsLong123456";

/// HS256 keys shorter than the hash output weaken the MAC.
pub const MIN_SECRET_BYTES: usize = 32;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// One year.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_seconds: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(&|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            token_ttl_seconds: parse_var(lookup, "JWT_EXPIRATION_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::invalid_value(
                "JWT_SECRET",
                "[REDACTED]",
                format!("must be at least {MIN_SECRET_BYTES} bytes"),
            ));
        }

        if self.token_ttl_seconds <= 0 {
            return Err(ConfigError::invalid_value(
                "JWT_EXPIRATION_SECONDS",
                self.token_ttl_seconds.to_string(),
                "must be greater than zero",
            ));
        }

        if self.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::invalid_value(
                "JWT_EXPIRATION_SECONDS",
                self.token_ttl_seconds.to_string(),
                format!("must be at most {MAX_TOKEN_TTL_SECONDS}"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_reads_secret_and_ttl() {
        let lookup = lookup_from(&[
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("JWT_EXPIRATION_SECONDS", "3600"),
        ]);
        let config = JwtConfig::from_lookup(&lookup).unwrap();

        assert_eq!(config.secret, "0123456789abcdef0123456789abcdef");
        assert_eq!(config.token_ttl_seconds, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = JwtConfig {
            secret: "too-short".to_string(),
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let config = JwtConfig {
            token_ttl_seconds: 0,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_above_one_year_rejected() {
        let lookup = lookup_from(&[("JWT_EXPIRATION_SECONDS", "9223372036854775807")]);
        let config = JwtConfig::from_lookup(&lookup).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRATION_SECONDS"));

        let config = JwtConfig {
            token_ttl_seconds: MAX_TOKEN_TTL_SECONDS,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::default());
        assert!(!rendered.contains(DEFAULT_JWT_SECRET));
        assert!(rendered.contains("REDACTED"));
    }
}
