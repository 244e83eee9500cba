//! # Ridegate Config
//!
//! Configuration types for the ridegate edge gateway, loaded from
//! environment variables (a `.env` file is honoured by the binaries through
//! `dotenvy`):
//!
//! - [`jwt`]: signing secret and token lifetime
//! - [`access`]: public path allowlist and path-prefix role rules
//! - [`upstream`]: downstream service routing table
//! - [`login`]: credential lookup timeout and password hash cost
//! - [`server`]: bind address
//! - [`cors`]: allowed browser origins
//!
//! Every struct implements [`Default`] with the values used when a variable
//! is unset, and a `from_lookup` constructor that reads variables through a
//! caller-supplied function so parsing can be tested without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use ridegate_config::GatewayConfig;
//!
//! let config = GatewayConfig::from_env()?;
//! println!("listening on {}", config.server.bind_address());
//! ```

pub mod access;
pub mod cors;
pub mod error;
pub mod jwt;
pub mod login;
pub mod server;
pub mod upstream;

use std::env;
use std::fmt::Display;
use std::str::FromStr;

// Re-export commonly used types at crate root
pub use access::{AccessConfig, RoleRuleConfig};
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use login::LoginConfig;
pub use server::ServerConfig;
pub use upstream::{UpstreamConfig, UpstreamRoute};

/// Reads a variable by name. `env::var(..).ok()` in production, a map in tests.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Complete gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub jwt: JwtConfig,
    pub access: AccessConfig,
    pub upstream: UpstreamConfig,
    pub login: LoginConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    /// PostgreSQL URL for the credential store; `None` selects the in-memory store
    pub database_url: Option<String>,
}

impl GatewayConfig {
    /// Loads and validates the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first variable that fails to
    /// parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let config = Self {
            jwt: JwtConfig::from_lookup(lookup)?,
            access: AccessConfig::from_lookup(lookup)?,
            upstream: UpstreamConfig::from_lookup(lookup)?,
            login: LoginConfig::from_lookup(lookup)?,
            server: ServerConfig::from_lookup(lookup)?,
            cors: CorsConfig::from_lookup(lookup),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.access.validate()?;
        self.upstream.validate()?;
        self.login.validate()?;
        Ok(())
    }
}

/// Parses `key` with [`FromStr`], falling back to `default` when unset.
pub(crate) fn parse_var<T>(lookup: Lookup<'_>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid_value(key, raw.clone(), e.to_string())),
        None => Ok(default),
    }
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses `a=b,c=d` into ordered pairs. Order is preserved.
pub(crate) fn parse_pairs(key: &'static str, raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    split_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => {
                Ok((left.trim().to_string(), right.trim().to_string()))
            }
            _ => Err(ConfigError::invalid_value(
                key,
                entry.clone(),
                "expected an entry of the form prefix=value",
            )),
        })
        .collect()
}
