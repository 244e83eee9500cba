//! Signed identity tokens.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 under the single
//! gateway secret. The payload is a [`Claims`] set; a token that verifies
//! becomes an [`IdentityContext`].
//!
//! # Verification order
//!
//! 1. Structure: three dot-separated segments, decodable header and claims,
//!    `exp > iat`. Failure is [`VerificationError::Malformed`].
//! 2. Signature: header must name HS256 and the MAC must match. Failure is
//!    [`VerificationError::SignatureInvalid`].
//! 3. Expiry: `now > exp` is [`VerificationError::Expired`]. A token is still
//!    valid at exactly its `exp` second.
//!
//! # Example
//!
//! ```ignore
//! use ridegate_auth::{Role, TokenCodec};
//! use ridegate_config::JwtConfig;
//!
//! let codec = TokenCodec::from_config(&JwtConfig::from_env()?);
//!
//! let token = codec.issue("alice", 42, Role::Driver)?;
//! let identity = codec.verify(&token)?;
//! assert_eq!(identity.subject_id(), 42);
//! ```

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, crypto, decode, encode};
use thiserror::Error;

use ridegate_config::JwtConfig;

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::identity::IdentityContext;
use crate::role::Role;

/// Why a token was refused. Logged by the gateway, never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

impl VerificationError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::Malformed => "malformed",
            VerificationError::SignatureInvalid => "signature_invalid",
            VerificationError::Expired => "expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token expiry overflows: issued at {issued_at}, ttl {ttl_seconds}s")]
    ExpiryOverflow { issued_at: i64, ttl_seconds: i64 },
}

/// Issues and verifies gateway tokens.
///
/// Holds only immutable key material and a clock, so one instance is shared
/// across all requests behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
    structure_only: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Creates a codec that reads the system clock.
    ///
    /// # Arguments
    ///
    /// * `secret` - The shared HMAC secret
    /// * `ttl_seconds` - Lifetime of every issued token; must be positive
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self::with_clock(secret, ttl_seconds, Arc::new(SystemClock))
    }

    /// Creates a codec with an explicit time source.
    pub fn with_clock(secret: &[u8], ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_seconds,
            clock,
            structure_only: structure_only_validation(),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.token_ttl_seconds)
    }

    /// Issues a token for the given identity.
    ///
    /// `iat` is the current clock reading and `exp` is `iat` plus the
    /// configured TTL. Identical inputs at the same clock reading yield an
    /// identical token.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::ExpiryOverflow`] if `iat + ttl` does not fit in an
    /// `i64`, or [`IssueError::Signing`] if the claims cannot be signed.
    pub fn issue(&self, username: &str, subject_id: i64, role: Role) -> Result<String, IssueError> {
        let now = self.clock.now();
        let exp = now
            .checked_add(self.ttl_seconds)
            .ok_or(IssueError::ExpiryOverflow {
                issued_at: now,
                ttl_seconds: self.ttl_seconds,
            })?;
        let claims = Claims {
            sub: username.to_string(),
            user_id: subject_id,
            role,
            iat: now,
            exp,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verifies a token and returns the identity it carries.
    ///
    /// # Errors
    ///
    /// - [`VerificationError::Malformed`] if the token cannot be parsed
    /// - [`VerificationError::SignatureInvalid`] if the MAC does not match
    /// - [`VerificationError::Expired`] if the clock is past `exp`
    pub fn verify(&self, token: &str) -> Result<IdentityContext, VerificationError> {
        if token.split('.').count() != 3 {
            return Err(VerificationError::Malformed);
        }
        let (message, signature) = token
            .rsplit_once('.')
            .ok_or(VerificationError::Malformed)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.structure_only)
            .map_err(|_| VerificationError::Malformed)?;

        if data.header.alg != Algorithm::HS256 {
            return Err(VerificationError::SignatureInvalid);
        }

        match crypto::verify(signature, message.as_bytes(), &self.decoding_key, Algorithm::HS256) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(VerificationError::SignatureInvalid),
        }

        let claims = data.claims;
        if claims.exp <= claims.iat {
            return Err(VerificationError::Malformed);
        }

        if self.clock.now() > claims.exp {
            return Err(VerificationError::Expired);
        }

        Ok(IdentityContext::from_claims(claims))
    }

    /// The configured issuance lifetime in seconds.
    ///
    /// This is the same for every token and is what login responses report
    /// as `expiresIn`.
    pub fn remaining_ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}

/// Decodes header and claims without checking the signature or any time
/// claim. Both are checked explicitly in [`TokenCodec::verify`] so each
/// failure maps to its own [`VerificationError`].
fn structure_only_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}
