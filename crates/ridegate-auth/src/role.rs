//! Caller roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The closed set of roles a token can carry.
///
/// Serialized as the upper-case name (`"DRIVER"`), which is also the value of
/// the `X-User-Role` header forwarded downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Driver, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Driver => "DRIVER",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether a caller holding `self` meets a rule requiring `required`.
    ///
    /// Spelled out pair by pair so a new variant fails to compile here until
    /// its access is decided.
    pub fn satisfies(self, required: Role) -> bool {
        match (self, required) {
            (Role::Customer, Role::Customer)
            | (Role::Driver, Role::Driver)
            | (Role::Admin, Role::Admin) => true,
            (Role::Customer, Role::Driver | Role::Admin)
            | (Role::Driver, Role::Customer | Role::Admin)
            | (Role::Admin, Role::Customer | Role::Driver) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "DRIVER" => Ok(Role::Driver),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
