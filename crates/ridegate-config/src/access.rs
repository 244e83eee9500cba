//! Path access configuration.
//!
//! # Environment Variables
//!
//! - `GATEWAY_PUBLIC_PATHS`: comma separated path prefixes that bypass
//!   authentication (default: `/auth/login,/auth/register`)
//! - `GATEWAY_ROLE_RULES`: comma separated `prefix=ROLE` entries, evaluated in
//!   the order given (default: `/api/customer=CUSTOMER,/api/driver=DRIVER`).
//!   `ROLE` is `CUSTOMER`, `DRIVER`, `ADMIN`, `ANY` or `PUBLIC`. Requests on
//!   `PUBLIC` prefixes reach downstream services with no `X-User-*` headers.
//!
//! Role names are upper-cased here and resolved when the authorization
//! policy is built.

use std::env;

use crate::{ConfigError, Lookup, parse_pairs, split_list};

pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/auth/login", "/auth/register"];

pub const DEFAULT_ROLE_RULES: &[(&str, &str)] =
    &[("/api/customer", "CUSTOMER"), ("/api/driver", "DRIVER")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRuleConfig {
    pub prefix: String,
    pub role: String,
}

impl RoleRuleConfig {
    pub fn new(prefix: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Ordered, duplicate-free
    pub public_paths: Vec<String>,
    pub role_rules: Vec<RoleRuleConfig>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            role_rules: DEFAULT_ROLE_RULES
                .iter()
                .map(|(prefix, role)| RoleRuleConfig::new(*prefix, *role))
                .collect(),
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(&|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let public_paths = match lookup("GATEWAY_PUBLIC_PATHS") {
            Some(raw) => dedup_preserving_order(split_list(&raw)),
            None => defaults.public_paths,
        };

        let role_rules = match lookup("GATEWAY_ROLE_RULES") {
            Some(raw) => parse_pairs("GATEWAY_ROLE_RULES", &raw)?
                .into_iter()
                .map(|(prefix, role)| RoleRuleConfig::new(prefix, role.to_ascii_uppercase()))
                .collect(),
            None => defaults.role_rules,
        };

        Ok(Self {
            public_paths,
            role_rules,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefixes = self
            .public_paths
            .iter()
            .map(|p| ("GATEWAY_PUBLIC_PATHS", p))
            .chain(self.role_rules.iter().map(|r| ("GATEWAY_ROLE_RULES", &r.prefix)));

        for (key, prefix) in prefixes {
            if !prefix.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    key,
                    prefix.clone(),
                    "path prefixes must start with '/'",
                ));
            }
        }

        Ok(())
    }
}

fn dedup_preserving_order(paths: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_public_paths_are_deduplicated_in_order() {
        let lookup = lookup_from(&[(
            "GATEWAY_PUBLIC_PATHS",
            "/auth/register, /auth/login,/auth/register,/health",
        )]);
        let config = AccessConfig::from_lookup(&lookup).unwrap();

        assert_eq!(
            config.public_paths,
            vec!["/auth/register", "/auth/login", "/health"]
        );
    }

    #[test]
    fn test_role_rules_keep_configured_order() {
        let lookup = lookup_from(&[("GATEWAY_ROLE_RULES", "/api/driver=driver,/api=public")]);
        let config = AccessConfig::from_lookup(&lookup).unwrap();

        assert_eq!(
            config.role_rules,
            vec![
                RoleRuleConfig::new("/api/driver", "DRIVER"),
                RoleRuleConfig::new("/api", "PUBLIC"),
            ]
        );
    }

    #[test]
    fn test_relative_prefix_rejected() {
        let config = AccessConfig {
            public_paths: vec!["auth/login".to_string()],
            role_rules: Vec::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_public_paths_allowed() {
        let lookup = lookup_from(&[("GATEWAY_PUBLIC_PATHS", "")]);
        let config = AccessConfig::from_lookup(&lookup).unwrap();
        assert!(config.public_paths.is_empty());
    }
}
