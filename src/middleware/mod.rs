//! Request middleware and extractors.
//!
//! - [`gateway`]: the [`GatewayFilterChain`](gateway::GatewayFilterChain)
//!   that authenticates and authorizes every routed request
//! - [`auth`]: [`CurrentIdentity`](auth::CurrentIdentity), which hands the
//!   verified caller to local handlers
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::CurrentIdentity;
//!
//! async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
//!     identity.username().to_string()
//! }
//! ```

pub mod auth;
pub mod gateway;
