//! # Ridegate Models
//!
//! Domain models and DTOs for the ridegate edge gateway:
//!
//! - [`users`]: the stored [`User`] record and [`NewUser`] insert payload
//! - [`auth`]: login, registration and profile request/response bodies
//!
//! All DTOs derive `utoipa::ToSchema` for the OpenAPI document, and request
//! bodies derive `validator::Validate`.

pub mod auth;
pub mod users;

// Re-export commonly used types at crate root
pub use auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse};
pub use ridegate_auth::Role;
pub use users::{NewUser, User};
