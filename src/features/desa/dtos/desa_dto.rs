use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::desa::models::Desa;

/// Request DTO for creating or renaming a desa
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDesaDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Sleman Barat")]
    pub name: String,
}

/// Response DTO for desa data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesaResponseDto {
    pub id: Uuid,
    pub name: String,
    pub kelompok_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Desa> for DesaResponseDto {
    fn from(desa: Desa) -> Self {
        Self {
            id: desa.id,
            name: desa.name,
            kelompok_count: desa.kelompok_count,
            created_at: desa.created_at,
            updated_at: desa.updated_at,
        }
    }
}
