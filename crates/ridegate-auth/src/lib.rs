//! # Ridegate Auth
//!
//! Identity primitives for the ridegate edge gateway.
//!
//! - [`role`]: the closed [`Role`] enumeration
//! - [`claims`]: the JWT [`Claims`] payload
//! - [`clock`]: injectable time source
//! - [`codec`]: [`TokenCodec`], which issues and verifies HS256 tokens
//! - [`identity`]: [`IdentityContext`], the verified caller of one request
//! - [`policy`]: [`AuthorizationPolicy`], ordered path-prefix access rules
//!
//! Everything here is synchronous and free of I/O. A codec and a policy are
//! built once at startup and shared read-only by every request.
//!
//! # Example
//!
//! ```ignore
//! use ridegate_auth::{AuthorizationPolicy, Role, TokenCodec};
//! use ridegate_config::{AccessConfig, JwtConfig};
//!
//! let codec = TokenCodec::from_config(&JwtConfig::default());
//! let policy = AuthorizationPolicy::from_config(&AccessConfig::default())?;
//!
//! let token = codec.issue("dave", 7, Role::Driver)?;
//! let identity = codec.verify(&token)?;
//! assert!(policy.is_authorized("/api/driver/profile", identity.role()));
//! ```

pub mod claims;
pub mod clock;
pub mod codec;
pub mod identity;
pub mod policy;
pub mod role;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{IssueError, TokenCodec, VerificationError};
pub use identity::IdentityContext;
pub use policy::{Access, AuthorizationPolicy, AuthorizationRule, PolicyError};
pub use role::{Role, UnknownRole};
