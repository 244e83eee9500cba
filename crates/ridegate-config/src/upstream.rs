//! Downstream routing table.
//!
//! `GATEWAY_ROUTES` holds comma separated `prefix=base_url` entries. A request
//! accepted by the filter chain is relayed to the first entry whose prefix
//! matches its path; the full original path and query are appended to the
//! base URL.

use std::env;
use std::time::Duration;

use crate::{ConfigError, Lookup, parse_pairs, parse_var};

pub const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("/api/driver", "http://localhost:8081"),
    ("/api/customer", "http://localhost:8082"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRoute {
    pub prefix: String,
    pub target: String,
}

impl UpstreamRoute {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub routes: Vec<UpstreamRoute>,
    pub timeout_seconds: u64,
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            routes: DEFAULT_ROUTES
                .iter()
                .map(|(prefix, target)| UpstreamRoute::new(*prefix, *target))
                .collect(),
            timeout_seconds: 30,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UpstreamConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(&|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let routes = match lookup("GATEWAY_ROUTES") {
            Some(raw) => parse_pairs("GATEWAY_ROUTES", &raw)?
                .into_iter()
                .map(|(prefix, target)| UpstreamRoute::new(prefix, target))
                .collect(),
            None => defaults.routes,
        };

        Ok(Self {
            routes,
            timeout_seconds: parse_var(lookup, "UPSTREAM_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
            max_body_bytes: parse_var(lookup, "UPSTREAM_MAX_BODY_BYTES", defaults.max_body_bytes)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for route in &self.routes {
            if !route.prefix.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    "GATEWAY_ROUTES",
                    route.prefix.clone(),
                    "path prefixes must start with '/'",
                ));
            }
            if !(route.target.starts_with("http://") || route.target.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    "GATEWAY_ROUTES",
                    route.target.clone(),
                    "targets must be http:// or https:// URLs",
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::invalid("UPSTREAM_TIMEOUT_SECONDS must be greater than zero"));
        }

        Ok(())
    }
}
