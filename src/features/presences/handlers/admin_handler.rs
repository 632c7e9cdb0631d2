use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::RequireAdmin;
use crate::features::presences::dtos::PresenceRecordDto;
use crate::features::presences::services::PresenceService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List presences recorded for an event (newest first)
#[utoipa::path(
    get,
    path = "/api/admin/events/{id}/presences",
    params(("id" = Uuid, Path, description = "Event ID"), PaginationQuery),
    responses(
        (status = 200, description = "Presences of the event", body = ApiResponse<Vec<PresenceRecordDto>>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "presences",
    security(("bearer_auth" = []))
)]
pub async fn list_event_presences(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
    AppQuery(params): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PresenceRecordDto>>>> {
    let (items, total) = service
        .list_for_event(id, params.offset(), params.limit())
        .await?;

    let dtos: Vec<PresenceRecordDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Delete a presence so the member can check in again
#[utoipa::path(
    delete,
    path = "/api/admin/presences/{id}",
    params(("id" = Uuid, Path, description = "Presence ID")),
    responses(
        (status = 200, description = "Presence deleted; returns the stale views", body = ApiResponse<Vec<String>>),
        (status = 404, description = "Presence not found")
    ),
    tag = "presences",
    security(("bearer_auth" = []))
)]
pub async fn delete_presence(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let invalidated = service.delete(id, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        Some(invalidated.iter().map(ToString::to_string).collect()),
        Some("Presensi berhasil dihapus".to_string()),
        None,
    )))
}
