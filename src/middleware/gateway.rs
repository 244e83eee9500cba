//! The per-request gateway filter.
//!
//! Every request that reaches the auth handlers or the downstream forwarder
//! passes through [`GatewayFilterChain::evaluate`] first:
//!
//! ```text
//! START -> PUBLIC_CHECK --public--> FORWARD (X-User-* removed, no identity)
//!               |
//!               v
//!        TOKEN_EXTRACTION --missing / wrong scheme--> REJECT 401
//!               |
//!               v
//!        TOKEN_VERIFICATION --malformed / forged / expired--> REJECT 401
//!               |
//!               v
//!        AUTHORIZATION --role not allowed--> REJECT 403
//!               |
//!               v
//!        FORWARD (X-User-* headers replaced, IdentityContext attached)
//! ```
//!
//! Rejections carry only `{"error": "Unauthorized"}` or
//! `{"error": "Forbidden"}`. Why a token was refused is logged, never sent.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use ridegate_auth::{AuthorizationPolicy, IdentityContext, Role, TokenCodec, VerificationError};
use ridegate_core::AppError;

use crate::metrics::track_filter_outcome;

pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USER_NAME: HeaderName = HeaderName::from_static("x-user-name");
pub const X_USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was stopped at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No `Authorization` header, a non-ASCII value, or a scheme other than `Bearer `
    MissingToken,
    /// The token failed verification
    InvalidToken(VerificationError),
    /// The token is valid but its role may not access the path
    Forbidden(Role),
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MissingToken | Rejection::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Rejection::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Metrics label. Never sent to the client.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::MissingToken => "missing_token",
            Rejection::InvalidToken(err) => err.kind(),
            Rejection::Forbidden(_) => "forbidden",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let message = match self.status() {
            StatusCode::FORBIDDEN => "Forbidden",
            _ => "Unauthorized",
        };
        AppError::new(self.status(), anyhow!(message)).into_response()
    }
}

#[derive(Debug)]
pub enum FilterOutcome<B> {
    Forward(Request<B>),
    Reject(Rejection),
}

/// Token verification plus path authorization, shared by every request.
#[derive(Debug)]
pub struct GatewayFilterChain {
    codec: Arc<TokenCodec>,
    policy: Arc<AuthorizationPolicy>,
}

impl GatewayFilterChain {
    pub fn new(codec: Arc<TokenCodec>, policy: Arc<AuthorizationPolicy>) -> Self {
        Self { codec, policy }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Runs one request through the chain.
    ///
    /// Public paths are forwarded without looking at the token and without
    /// any `X-User-*` header. Every other forwarded request carries exactly
    /// one `X-User-Id`, `X-User-Name` and `X-User-Role` value, taken from the
    /// verified token, and an [`IdentityContext`] in its extensions.
    pub fn evaluate<B>(&self, mut req: Request<B>) -> FilterOutcome<B> {
        if self.policy.is_public(req.uri().path()) {
            debug!(path = %req.uri().path(), "Public path, forwarding without authentication");
            remove_identity_headers(req.headers_mut());
            return FilterOutcome::Forward(req);
        }

        let path = req.uri().path();

        let Some(token) = bearer_token(req.headers()) else {
            debug!(path = %path, "Missing or malformed Authorization header");
            return FilterOutcome::Reject(Rejection::MissingToken);
        };

        let identity = match self.codec.verify(token) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(path = %path, kind = err.kind(), "Token verification failed");
                return FilterOutcome::Reject(Rejection::InvalidToken(err));
            }
        };

        if !self.policy.is_authorized(path, identity.role()) {
            warn!(
                path = %path,
                user_id = identity.subject_id(),
                role = %identity.role(),
                required = %self.policy.classify(path),
                "Access denied"
            );
            return FilterOutcome::Reject(Rejection::Forbidden(identity.role()));
        }

        let Ok(username) = HeaderValue::from_str(identity.username()) else {
            warn!(
                path = %path,
                user_id = identity.subject_id(),
                "Token subject cannot be carried in a header"
            );
            return FilterOutcome::Reject(Rejection::InvalidToken(VerificationError::Malformed));
        };

        let headers = req.headers_mut();
        remove_identity_headers(headers);
        headers.insert(X_USER_ID, HeaderValue::from(identity.subject_id()));
        headers.insert(X_USER_NAME, username);
        headers.insert(X_USER_ROLE, HeaderValue::from_static(identity.role().as_str()));

        req.extensions_mut().insert(identity);

        FilterOutcome::Forward(req)
    }
}

/// Drops every client-supplied value of the identity headers.
fn remove_identity_headers(headers: &mut HeaderMap) {
    headers.remove(&X_USER_ID);
    headers.remove(&X_USER_NAME);
    headers.remove(&X_USER_ROLE);
}

/// Extracts the token from `Authorization: Bearer <token>`. The scheme is
/// case-sensitive and must be followed by exactly one space.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Axum middleware wrapping [`GatewayFilterChain::evaluate`].
pub async fn gateway_filter(
    State(chain): State<Arc<GatewayFilterChain>>,
    req: Request,
    next: Next,
) -> Response {
    match chain.evaluate(req) {
        FilterOutcome::Forward(req) => {
            let outcome = if req.extensions().get::<IdentityContext>().is_some() {
                "authenticated"
            } else {
                "public"
            };
            track_filter_outcome(outcome);
            next.run(req).await
        }
        FilterOutcome::Reject(rejection) => {
            track_filter_outcome(rejection.reason());
            rejection.into_response()
        }
    }
}
