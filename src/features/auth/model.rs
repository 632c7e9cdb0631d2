use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
    /// Session UID (only present for interactive OIDC flows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Check if user may use the back-office (super_admin or admin)
    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_ADMIN)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub roles: Vec<String>,
}
