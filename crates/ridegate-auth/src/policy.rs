//! Path-prefix authorization.
//!
//! An [`AuthorizationPolicy`] is an ordered list of [`AuthorizationRule`]s.
//! A path is classified by the **first** rule whose prefix it starts with;
//! later rules are not consulted even if their prefix is longer. Reordering
//! rules therefore changes behaviour:
//!
//! ```text
//! /api/driver -> DRIVER       /api        -> PUBLIC
//! /api        -> PUBLIC       /api/driver -> DRIVER
//!
//! /api/driver/123 => DRIVER   /api/driver/123 => PUBLIC
//! ```
//!
//! A path no rule matches is [`Access::Any`]: it needs a valid token but no
//! particular role.
//!
//! Prefix matching is a plain string test, so `/api/driver` also covers
//! `/api/drivers`. Add a trailing `/` to the prefix to restrict it to one
//! path segment.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use ridegate_config::AccessConfig;

use crate::role::Role;

/// What a path requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token needed
    Public,
    /// Any valid token
    Any,
    /// A valid token carrying this role
    Role(Role),
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Public => f.write_str("PUBLIC"),
            Access::Any => f.write_str("ANY"),
            Access::Role(role) => write!(f, "{role}"),
        }
    }
}

impl FromStr for Access {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Access::Public),
            "ANY" => Ok(Access::Any),
            other => other
                .parse::<Role>()
                .map(Access::Role)
                .map_err(|_| PolicyError::UnknownAccess(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown access level {0:?}; expected CUSTOMER, DRIVER, ADMIN, ANY or PUBLIC")]
    UnknownAccess(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRule {
    pub path_prefix: String,
    pub access: Access,
}

impl AuthorizationRule {
    pub fn new(path_prefix: impl Into<String>, access: Access) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            access,
        }
    }
}

/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    rules: Vec<AuthorizationRule>,
}

impl AuthorizationPolicy {
    /// Rules are evaluated in the order given.
    pub fn new(rules: Vec<AuthorizationRule>) -> Self {
        Self { rules }
    }

    /// Builds the rule table from configuration: every public path first, in
    /// configured order, then the role rules in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownAccess`] for a role rule whose value is
    /// not a known role, `ANY` or `PUBLIC`.
    pub fn from_config(config: &AccessConfig) -> Result<Self, PolicyError> {
        let mut rules = Vec::with_capacity(config.public_paths.len() + config.role_rules.len());

        for prefix in &config.public_paths {
            rules.push(AuthorizationRule::new(prefix.clone(), Access::Public));
        }

        for rule in &config.role_rules {
            rules.push(AuthorizationRule::new(rule.prefix.clone(), rule.role.parse()?));
        }

        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[AuthorizationRule] {
        &self.rules
    }

    /// First matching rule wins; no match means [`Access::Any`].
    pub fn classify(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| path.starts_with(&rule.path_prefix))
            .map(|rule| rule.access)
            .unwrap_or(Access::Any)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.classify(path) == Access::Public
    }

    pub fn is_authorized(&self, path: &str, role: Role) -> bool {
        match self.classify(path) {
            Access::Public | Access::Any => true,
            Access::Role(required) => role.satisfies(required),
        }
    }
}
