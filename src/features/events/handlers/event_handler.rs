use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::events::dtos::{EventResponseDto, UpsertEventDto};
use crate::features::events::services::EventService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List events (paginated, search by title)
#[utoipa::path(
    get,
    path = "/api/admin/events",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of events", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn list_events(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EventService>>,
    AppQuery(params): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let (items, total) = service
        .list(
            params.search_pattern().as_deref(),
            params.offset(),
            params.limit(),
        )
        .await?;

    let now = Utc::now();
    let dtos: Vec<EventResponseDto> = items
        .into_iter()
        .map(|event| EventResponseDto::from_event(event, now))
        .collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/api/admin/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn get_event(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.get(id).await?;
    Ok(Json(ApiResponse::success(
        Some(EventResponseDto::from_event(event, Utc::now())),
        None,
        None,
    )))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/admin/events",
    request_body = UpsertEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<UpsertEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.create(dto, &user.account_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(EventResponseDto::from_event(event, Utc::now())),
            Some("Acara berhasil dibuat".to_string()),
            None,
        )),
    ))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/api/admin/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpsertEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.update(id, dto, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        Some(EventResponseDto::from_event(event, Utc::now())),
        Some("Acara berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete an event and its presence records
#[utoipa::path(
    delete,
    path = "/api/admin/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Acara berhasil dihapus".to_string()),
        None,
    )))
}
