use crate::claims::Claims;
use crate::role::Role;

/// The verified caller of one request.
///
/// Only [`TokenCodec::verify`](crate::TokenCodec::verify) creates these, so
/// holding one proves the token checked out. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    subject_id: i64,
    username: String,
    role: Role,
    expires_at: i64,
}

impl IdentityContext {
    pub(crate) fn from_claims(claims: Claims) -> Self {
        Self {
            subject_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
            expires_at: claims.exp,
        }
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Token expiry, Unix seconds.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}
