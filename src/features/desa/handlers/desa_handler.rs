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
use crate::features::desa::dtos::{DesaResponseDto, UpsertDesaDto};
use crate::features::desa::services::DesaService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List desa (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/desa",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of desa", body = ApiResponse<Vec<DesaResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "desa",
    security(("bearer_auth" = []))
)]
pub async fn list_desa(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DesaService>>,
    AppQuery(params): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DesaResponseDto>>>> {
    let (items, total) = service
        .list(
            params.search_pattern().as_deref(),
            params.offset(),
            params.limit(),
        )
        .await?;

    let dtos: Vec<DesaResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a desa by ID
#[utoipa::path(
    get,
    path = "/api/admin/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    responses(
        (status = 200, description = "Desa details", body = ApiResponse<DesaResponseDto>),
        (status = 404, description = "Desa not found")
    ),
    tag = "desa",
    security(("bearer_auth" = []))
)]
pub async fn get_desa(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DesaResponseDto>>> {
    let desa = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(desa.into()), None, None)))
}

/// Create a desa
#[utoipa::path(
    post,
    path = "/api/admin/desa",
    request_body = UpsertDesaDto,
    responses(
        (status = 201, description = "Desa created", body = ApiResponse<DesaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Desa name already exists")
    ),
    tag = "desa",
    security(("bearer_auth" = []))
)]
pub async fn create_desa(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<DesaService>>,
    AppJson(dto): AppJson<UpsertDesaDto>,
) -> Result<(StatusCode, Json<ApiResponse<DesaResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let desa = service.create(dto, &user.account_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(desa.into()),
            Some("Desa berhasil ditambahkan".to_string()),
            None,
        )),
    ))
}

/// Rename a desa
#[utoipa::path(
    put,
    path = "/api/admin/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    request_body = UpsertDesaDto,
    responses(
        (status = 200, description = "Desa updated", body = ApiResponse<DesaResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Desa not found"),
        (status = 409, description = "Desa name already exists")
    ),
    tag = "desa",
    security(("bearer_auth" = []))
)]
pub async fn update_desa(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertDesaDto>,
) -> Result<Json<ApiResponse<DesaResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let desa = service.update(id, dto, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        Some(desa.into()),
        Some("Desa berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete a desa without kelompok
#[utoipa::path(
    delete,
    path = "/api/admin/desa/{id}",
    params(("id" = Uuid, Path, description = "Desa ID")),
    responses(
        (status = 200, description = "Desa deleted"),
        (status = 404, description = "Desa not found"),
        (status = 409, description = "Desa still has kelompok")
    ),
    tag = "desa",
    security(("bearer_auth" = []))
)]
pub async fn delete_desa(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<DesaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Desa berhasil dihapus".to_string()),
        None,
    )))
}
