use axum::{Router, routing::post};

use super::controller::{login_user, logout_user, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
        .route("/logout", post(logout_user))
}
