//! HTTP-facing error type.
//!
//! Every handler and middleware in the gateway returns [`AppError`] on the
//! failure path. The error renders as a JSON body:
//!
//! ```json
//! { "error": "Username already exists" }
//! ```
//!
//! Validation failures additionally carry a `fields` object mapping each
//! offending field to its message. Server errors (5xx) never expose their
//! internal cause: the cause is logged and the body carries a generic message.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use utoipa::ToSchema;

/// Message returned for every 500 response.
pub const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// JSON error body, documented for the OpenAPI schema.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Field-level messages, present only on validation failures
    pub fields: Option<BTreeMap<String, String>>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<BTreeMap<String, String>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn bad_gateway<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_GATEWAY, err)
    }

    /// A 400 carrying one message per invalid field.
    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("Validation failed"),
            fields: Some(fields),
        }
    }

    /// The message the client will see for this error.
    pub fn public_message(&self) -> String {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            GENERIC_INTERNAL_MESSAGE.to_string()
        } else if self.status.is_server_error() {
            self.status
                .canonical_reason()
                .unwrap_or(GENERIC_INTERNAL_MESSAGE)
                .to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status.as_u16(),
                error = ?self.error,
                "Request failed with server error"
            );
        }

        let message = self.public_message();
        let body = match self.fields {
            Some(fields) => json!({ "error": message, "fields": fields }),
            None => json!({ "error": message }),
        };

        (self.status, Json(body)).into_response()
    }
}
