use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::generus::dtos::{GenerusQuery, GenerusResponseDto, UpsertGenerusDto};
use crate::features::generus::services::GenerusService;
use crate::shared::types::{ApiResponse, Meta};

/// List generus (paginated, optionally within one kelompok)
#[utoipa::path(
    get,
    path = "/api/admin/generus",
    params(GenerusQuery),
    responses(
        (status = 200, description = "List of generus", body = ApiResponse<Vec<GenerusResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "generus",
    security(("bearer_auth" = []))
)]
pub async fn list_generus(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<GenerusService>>,
    AppQuery(query): AppQuery<GenerusQuery>,
) -> Result<Json<ApiResponse<Vec<GenerusResponseDto>>>> {
    let pagination = query.pagination();
    let (items, total) = service
        .list(
            pagination.search_pattern().as_deref(),
            query.kelompok_id,
            pagination.offset(),
            pagination.limit(),
        )
        .await?;

    let dtos: Vec<GenerusResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a generus by ID
#[utoipa::path(
    get,
    path = "/api/admin/generus/{id}",
    params(("id" = Uuid, Path, description = "Generus ID")),
    responses(
        (status = 200, description = "Generus details", body = ApiResponse<GenerusResponseDto>),
        (status = 404, description = "Generus not found")
    ),
    tag = "generus",
    security(("bearer_auth" = []))
)]
pub async fn get_generus(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<GenerusService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GenerusResponseDto>>> {
    let generus = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(generus.into()), None, None)))
}

/// Register a generus
#[utoipa::path(
    post,
    path = "/api/admin/generus",
    request_body = UpsertGenerusDto,
    responses(
        (status = 201, description = "Generus created", body = ApiResponse<GenerusResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Kelompok not found")
    ),
    tag = "generus",
    security(("bearer_auth" = []))
)]
pub async fn create_generus(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<GenerusService>>,
    AppJson(dto): AppJson<UpsertGenerusDto>,
) -> Result<(StatusCode, Json<ApiResponse<GenerusResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let generus = service.create(dto, &user.account_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(generus.into()),
            Some("Generus berhasil ditambahkan".to_string()),
            None,
        )),
    ))
}

/// Update a generus
#[utoipa::path(
    put,
    path = "/api/admin/generus/{id}",
    params(("id" = Uuid, Path, description = "Generus ID")),
    request_body = UpsertGenerusDto,
    responses(
        (status = 200, description = "Generus updated", body = ApiResponse<GenerusResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Generus or kelompok not found")
    ),
    tag = "generus",
    security(("bearer_auth" = []))
)]
pub async fn update_generus(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<GenerusService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertGenerusDto>,
) -> Result<Json<ApiResponse<GenerusResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let generus = service.update(id, dto, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        Some(generus.into()),
        Some("Generus berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete a generus and their presence records
#[utoipa::path(
    delete,
    path = "/api/admin/generus/{id}",
    params(("id" = Uuid, Path, description = "Generus ID")),
    responses(
        (status = 200, description = "Generus deleted"),
        (status = 404, description = "Generus not found")
    ),
    tag = "generus",
    security(("bearer_auth" = []))
)]
pub async fn delete_generus(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<GenerusService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Generus berhasil dihapus".to_string()),
        None,
    )))
}
