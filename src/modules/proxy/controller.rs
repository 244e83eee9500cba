use axum::extract::{Request, State};
use axum::response::Response;

use ridegate_core::AppError;

use crate::state::AppState;

/// Fallback handler: everything the gateway does not serve itself.
pub async fn proxy_request(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    state.proxy.forward(req).await
}
