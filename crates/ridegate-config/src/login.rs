use std::env;
use std::time::Duration;

use crate::{ConfigError, Lookup, parse_var};

/// bcrypt accepts cost factors in this range.
const HASH_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginConfig {
    /// Upper bound on a single credential store lookup during login
    pub credential_lookup_timeout_ms: u64,
    pub password_hash_cost: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            credential_lookup_timeout_ms: 3_000,
            password_hash_cost: 12,
        }
    }
}

impl LoginConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(&|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            credential_lookup_timeout_ms: parse_var(
                lookup,
                "CREDENTIAL_LOOKUP_TIMEOUT_MS",
                defaults.credential_lookup_timeout_ms,
            )?,
            password_hash_cost: parse_var(lookup, "PASSWORD_HASH_COST", defaults.password_hash_cost)?,
        })
    }

    pub fn credential_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.credential_lookup_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential_lookup_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "CREDENTIAL_LOOKUP_TIMEOUT_MS must be greater than zero",
            ));
        }

        if !HASH_COST_RANGE.contains(&self.password_hash_cost) {
            return Err(ConfigError::invalid_value(
                "PASSWORD_HASH_COST",
                self.password_hash_cost.to_string(),
                "must be between 4 and 31",
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
    fn test_reads_timeout_and_cost() {
        let lookup = lookup_from(&[
            ("CREDENTIAL_LOOKUP_TIMEOUT_MS", "250"),
            ("PASSWORD_HASH_COST", "10"),
        ]);
        let config = LoginConfig::from_lookup(&lookup).unwrap();

        assert_eq!(config.credential_lookup_timeout(), Duration::from_millis(250));
        assert_eq!(config.password_hash_cost, 10);
    }

    #[test]
    fn test_cost_out_of_range_rejected() {
        let config = LoginConfig {
            password_hash_cost: 3,
            ..LoginConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
