//! JWT claim structure for gateway tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::role::Role;

/// Claims carried by every gateway token.
///
/// Field order is the serialization order, so the same claim set always
/// produces the same payload bytes and therefore the same signature.
///
/// # Fields
///
/// - `sub`: username (subject)
/// - `userId`: numeric user id
/// - `role`: caller role
/// - `iat`: issued-at (Unix seconds)
/// - `exp`: expiry (Unix seconds), strictly after `iat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
