//! Password hashing.
//!
//! The login flow depends on [`PasswordHasher`] rather than on bcrypt
//! directly, so tests can run with a cheap cost factor. Comparison of the
//! supplied password against the stored hash is done by bcrypt in constant
//! time.

use bcrypt::{DEFAULT_COST, hash, verify};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(#[source] bcrypt::BcryptError),
    #[error("failed to verify password: {0}")]
    Verify(#[source] bcrypt::BcryptError),
}

/// Hashes passwords for storage and checks candidates against stored hashes.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Returns `Ok(false)` on mismatch; errors only when the stored hash is
    /// unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// bcrypt with a configurable cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(PasswordError::Hash)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(password, hash).map_err(PasswordError::Verify)
    }
}
