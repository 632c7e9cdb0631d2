use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::audit_logs::dtos::{AuditLogQuery, AuditLogResponseDto};
use crate::features::audit_logs::services::AuditLogService;
use crate::features::auth::guards::RequireSuperAdmin;
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::validation::ENTITY_TYPE_REGEX;

/// List audit log entries (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "List of audit log entries", body = ApiResponse<Vec<AuditLogResponseDto>>),
        (status = 400, description = "Invalid entity type filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super admin access required")
    ),
    tag = "audit-logs",
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<AuditLogService>>,
    AppQuery(query): AppQuery<AuditLogQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLogResponseDto>>>> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(entity_type) = entity_type {
        if !ENTITY_TYPE_REGEX.is_match(entity_type) {
            return Err(AppError::BadRequest(format!(
                "Invalid entity type '{}'",
                entity_type
            )));
        }
    }

    let pagination = query.pagination();
    let (items, total) = service
        .list(entity_type, pagination.offset(), pagination.limit())
        .await?;

    let dtos: Vec<AuditLogResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}
