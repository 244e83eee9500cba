//! # Ridegate Core
//!
//! Foundational types shared by every ridegate crate:
//!
//! - [`errors`]: the HTTP-facing [`AppError`] and its JSON body
//! - [`password`]: the [`PasswordHasher`] trait and its bcrypt implementation
//!
//! # Example
//!
//! ```ignore
//! use ridegate_core::{AppError, BcryptHasher, PasswordHasher};
//!
//! let hasher = BcryptHasher::default();
//! let hash = hasher.hash("correct horse battery staple")?;
//! assert!(hasher.verify("correct horse battery staple", &hash)?);
//!
//! let error = AppError::conflict(anyhow::anyhow!("Username already exists"));
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
pub use password::{BcryptHasher, PasswordError, PasswordHasher};
