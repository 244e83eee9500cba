//! Authentication request and response bodies.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use ridegate_auth::Role;

use crate::users::User;

/// Login credentials.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "dave")]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Self-service registration.
///
/// Only `CUSTOMER` and `DRIVER` accounts can be registered this way; admin
/// accounts are created with `ridegate-cli create-admin`.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "username must be between 3 and 50 characters"),
        custom(function = "validate_username_charset")
    )]
    #[schema(example = "dave")]
    pub username: String,
    #[validate(length(min = 8, max = 72, message = "password must be between 8 and 72 characters"))]
    pub password: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "dave@example.com")]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "phone must be between 7 and 20 characters"))]
    #[serde(default)]
    #[schema(example = "+15551234567")]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_self_service_role"))]
    pub role: Role,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Usernames travel downstream in the `X-User-Name` header, so they are kept
/// to a header-safe character set.
pub fn validate_username_charset(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset").with_message(Cow::Borrowed(
            "username may only contain letters, digits, '.', '_' and '-'",
        )))
    }
}

fn validate_self_service_role(role: &Role) -> Result<(), ValidationError> {
    match role {
        Role::Customer | Role::Driver => Ok(()),
        Role::Admin => Err(ValidationError::new("role_not_allowed")
            .with_message(Cow::Borrowed("role must be CUSTOMER or DRIVER"))),
    }
}

/// Public profile of a user. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Always `"Bearer"`
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Configured token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
