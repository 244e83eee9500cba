use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{info, instrument};

use ridegate_core::{AppError, ErrorResponse};
use ridegate_models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse};

use super::service::AuthService;
use crate::middleware::auth::CurrentIdentity;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new customer or driver account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register_user(state.users.as_ref(), state.hasher.clone(), dto).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or disabled account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.login_issuer, dto).await?;
    Ok(Json(response))
}

/// Log out. Tokens are stateless; the client discards its token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_user(CurrentIdentity(identity): CurrentIdentity) -> Json<MessageResponse> {
    info!(
        user_id = identity.subject_id(),
        username = %identity.username(),
        "User logged out"
    );
    Json(MessageResponse::new("Logged out successfully"))
}
