use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};
use tracing::{info, instrument, warn};

use ridegate_auth::{IssueError, TokenCodec};
use ridegate_core::{AppError, PasswordError, PasswordHasher};
use ridegate_db::{RepositoryError, UserRepository};
use ridegate_models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, User};

use crate::metrics::{track_login_failure, track_login_success, track_user_registered};

/// Hashed once per issuer and verified against when the username is unknown.
const PLACEHOLDER_PASSWORD: &str = "ridegate-placeholder-credential";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Reported to clients exactly like [`AuthError::InvalidCredentials`].
    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("credential lookup timed out after {0:?}")]
    LookupTimeout(Duration),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] IssueError),

    #[error("password task failed: {0}")]
    Blocking(#[from] JoinError),
}

impl AuthError {
    /// Metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountDisabled => "account_disabled",
            AuthError::UsernameTaken => "username_taken",
            AuthError::EmailTaken => "email_taken",
            AuthError::LookupTimeout(_) => "lookup_timeout",
            AuthError::Repository(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::Blocking(_) => "internal",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountDisabled => {
                return AppError::unauthorized(AuthError::InvalidCredentials);
            }
            AuthError::UsernameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::LookupTimeout(_)
            | AuthError::Repository(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err)
    }
}

/// Verifies credentials and mints tokens.
///
/// The credential lookup is the only await point that touches the store and
/// is bounded by `lookup_timeout`. Password comparison runs on the blocking
/// pool. An unknown username is still checked against a placeholder hash so
/// both failure paths cost one password verification.
pub struct LoginIssuer {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    lookup_timeout: Duration,
    placeholder_hash: Arc<str>,
}

impl LoginIssuer {
    /// # Errors
    ///
    /// Fails if the placeholder hash cannot be computed.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
        lookup_timeout: Duration,
    ) -> Result<Self, PasswordError> {
        let placeholder_hash = hasher.hash(PLACEHOLDER_PASSWORD)?.into();

        Ok(Self {
            users,
            hasher,
            codec,
            lookup_timeout,
            placeholder_hash,
        })
    }

    /// Returns a fresh token and the stored user.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] for an unknown username or a wrong password
    /// - [`AuthError::AccountDisabled`] for a disabled account, only once the
    ///   password matched; clients see the same 401 as for bad credentials
    /// - [`AuthError::LookupTimeout`] if the store does not answer in time
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, User), AuthError> {
        let found = tokio::time::timeout(self.lookup_timeout, self.users.find_by_username(username))
            .await
            .map_err(|_| AuthError::LookupTimeout(self.lookup_timeout))??;

        let Some(user) = found else {
            let hasher = Arc::clone(&self.hasher);
            let candidate = password.to_owned();
            let placeholder = Arc::clone(&self.placeholder_hash);
            let _ = spawn_blocking(move || hasher.verify(&candidate, &placeholder)).await?;
            return Err(AuthError::InvalidCredentials);
        };

        let hasher = Arc::clone(&self.hasher);
        let candidate = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let matches = spawn_blocking(move || hasher.verify(&candidate, &stored_hash)).await??;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        let token = self.codec.issue(&user.username, user.id, user.role)?;

        Ok((token, user))
    }

    /// Lifetime reported to clients as `expiresIn`.
    pub fn token_ttl_seconds(&self) -> i64 {
        self.codec.remaining_ttl_seconds()
    }
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, hasher))]
    pub async fn register_user(
        users: &dyn UserRepository,
        hasher: Arc<dyn PasswordHasher>,
        dto: RegisterRequest,
    ) -> Result<User, AuthError> {
        if users.exists_by_username(&dto.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        if users.exists_by_email(&dto.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = dto.password;
        let password_hash = spawn_blocking(move || hasher.hash(&password)).await??;

        // The store's unique constraints catch registrations racing past the checks above.
        let user = users
            .create(NewUser {
                username: dto.username,
                password_hash,
                email: dto.email,
                phone: dto.phone,
                role: dto.role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Duplicate { field: "email" } => AuthError::EmailTaken,
                RepositoryError::Duplicate { .. } => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = user.id, role = %user.role, "User registered");
        track_user_registered(user.role.as_str());

        Ok(user)
    }

    #[instrument(skip(issuer))]
    pub async fn login_user(issuer: &LoginIssuer, dto: LoginRequest) -> Result<LoginResponse, AuthError> {
        match issuer.authenticate(&dto.username, &dto.password).await {
            Ok((token, user)) => {
                info!(user_id = user.id, role = %user.role, "Login succeeded");
                track_login_success(user.role.as_str());
                Ok(LoginResponse::bearer(
                    token,
                    issuer.token_ttl_seconds(),
                    user.into(),
                ))
            }
            Err(err) => {
                warn!(reason = err.reason(), "Login failed");
                track_login_failure(err.reason());
                Err(err)
            }
        }
    }
}
