use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

/// Namespace of the role claim configured in the identity provider
const CUSTOM_CLAIMS_NAMESPACE: &str = "https://presensi.generus.id/claims";

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(rename = "accountId", default)]
    account_id: Option<String>,
    #[serde(rename = "sessionUid", default)]
    session_uid: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Roles from the namespaced custom claim, falling back to space-separated scopes
    fn roles(&self) -> Vec<String> {
        let custom = self
            .extra
            .get(CUSTOM_CLAIMS_NAMESPACE)
            .cloned()
            .and_then(|v| serde_json::from_value::<CustomClaims>(v).ok());

        match custom {
            Some(custom) => custom.roles,
            None => self
                .scope
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        if let Some(kind) = &claims.kind {
            if kind != "AccessToken" {
                return Err(AppError::Auth("Token is not an access token".to_string()));
            }
        }

        let roles = claims.roles();
        let account_id = claims.account_id.clone().unwrap_or_else(|| claims.sub.clone());

        tracing::debug!("Token validated for account {} with roles {:?}", account_id, roles);

        Ok(AuthenticatedUser {
            account_id,
            sub: claims.sub,
            session_uid: claims.session_uid,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_from(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_roles_from_custom_claims() {
        let claims = claims_from(serde_json::json!({
            "sub": "user-1",
            "https://presensi.generus.id/claims": { "roles": ["admin"] },
            "scope": "openid"
        }));
        assert_eq!(claims.roles(), vec!["admin".to_string()]);
    }

    #[test]
    fn test_roles_fall_back_to_scope() {
        let claims = claims_from(serde_json::json!({
            "sub": "user-1",
            "scope": "super_admin admin"
        }));
        assert_eq!(
            claims.roles(),
            vec!["super_admin".to_string(), "admin".to_string()]
        );
    }

    #[test]
    fn test_no_roles() {
        let claims = claims_from(serde_json::json!({ "sub": "user-1" }));
        assert!(claims.roles().is_empty());
    }
}
