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
use crate::features::kelompok::dtos::{KelompokQuery, KelompokResponseDto, UpsertKelompokDto};
use crate::features::kelompok::services::KelompokService;
use crate::shared::types::{ApiResponse, Meta};

/// List kelompok (paginated, optionally within one desa)
#[utoipa::path(
    get,
    path = "/api/admin/kelompok",
    params(KelompokQuery),
    responses(
        (status = 200, description = "List of kelompok", body = ApiResponse<Vec<KelompokResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "kelompok",
    security(("bearer_auth" = []))
)]
pub async fn list_kelompok(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<KelompokService>>,
    AppQuery(query): AppQuery<KelompokQuery>,
) -> Result<Json<ApiResponse<Vec<KelompokResponseDto>>>> {
    let pagination = query.pagination();
    let (items, total) = service
        .list(
            pagination.search_pattern().as_deref(),
            query.desa_id,
            pagination.offset(),
            pagination.limit(),
        )
        .await?;

    let dtos: Vec<KelompokResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a kelompok by ID
#[utoipa::path(
    get,
    path = "/api/admin/kelompok/{id}",
    params(("id" = Uuid, Path, description = "Kelompok ID")),
    responses(
        (status = 200, description = "Kelompok details", body = ApiResponse<KelompokResponseDto>),
        (status = 404, description = "Kelompok not found")
    ),
    tag = "kelompok",
    security(("bearer_auth" = []))
)]
pub async fn get_kelompok(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<KelompokService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<KelompokResponseDto>>> {
    let kelompok = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(kelompok.into()), None, None)))
}

/// Create a kelompok
#[utoipa::path(
    post,
    path = "/api/admin/kelompok",
    request_body = UpsertKelompokDto,
    responses(
        (status = 201, description = "Kelompok created", body = ApiResponse<KelompokResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Desa not found"),
        (status = 409, description = "Kelompok name already exists in the desa")
    ),
    tag = "kelompok",
    security(("bearer_auth" = []))
)]
pub async fn create_kelompok(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<KelompokService>>,
    AppJson(dto): AppJson<UpsertKelompokDto>,
) -> Result<(StatusCode, Json<ApiResponse<KelompokResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let kelompok = service.create(dto, &user.account_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(kelompok.into()),
            Some("Kelompok berhasil ditambahkan".to_string()),
            None,
        )),
    ))
}

/// Update a kelompok
#[utoipa::path(
    put,
    path = "/api/admin/kelompok/{id}",
    params(("id" = Uuid, Path, description = "Kelompok ID")),
    request_body = UpsertKelompokDto,
    responses(
        (status = 200, description = "Kelompok updated", body = ApiResponse<KelompokResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Kelompok or desa not found"),
        (status = 409, description = "Kelompok name already exists in the desa")
    ),
    tag = "kelompok",
    security(("bearer_auth" = []))
)]
pub async fn update_kelompok(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<KelompokService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertKelompokDto>,
) -> Result<Json<ApiResponse<KelompokResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let kelompok = service.update(id, dto, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        Some(kelompok.into()),
        Some("Kelompok berhasil diperbarui".to_string()),
        None,
    )))
}

/// Delete a kelompok without generus
#[utoipa::path(
    delete,
    path = "/api/admin/kelompok/{id}",
    params(("id" = Uuid, Path, description = "Kelompok ID")),
    responses(
        (status = 200, description = "Kelompok deleted"),
        (status = 404, description = "Kelompok not found"),
        (status = 409, description = "Kelompok still has generus")
    ),
    tag = "kelompok",
    security(("bearer_auth" = []))
)]
pub async fn delete_kelompok(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<KelompokService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &user.account_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Kelompok berhasil dihapus".to_string()),
        None,
    )))
}
