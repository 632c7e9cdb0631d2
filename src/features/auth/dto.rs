use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    pub is_super_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let is_super_admin = user.is_super_admin();
        Self {
            account_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
            is_super_admin,
        }
    }
}
