use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};

use ridegate_auth::IdentityContext;
use ridegate_core::AppError;

/// Extractor for the caller the gateway filter already verified.
///
/// The filter attaches an [`IdentityContext`] to every non-public request it
/// forwards. Handlers mounted on a public path never see one, so using this
/// extractor there always yields 401.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub IdentityContext);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| AppError::unauthorized(anyhow!("Unauthorized")))
    }
}
