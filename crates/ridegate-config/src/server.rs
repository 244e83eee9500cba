use std::env;

use crate::{ConfigError, Lookup, parse_var};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_var(lookup, "SERVER_PORT", defaults.port)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_bind_address() {
        let lookup = lookup_from(&[("SERVER_HOST", "127.0.0.1"), ("SERVER_PORT", "9090")]);
        let config = ServerConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_port_out_of_range_rejected() {
        let lookup = lookup_from(&[("SERVER_PORT", "70000")]);
        assert!(ServerConfig::from_lookup(&lookup).is_err());
    }
}
