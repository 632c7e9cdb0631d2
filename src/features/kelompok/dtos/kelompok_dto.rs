use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::kelompok::models::Kelompok;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

/// Query parameters for listing kelompok
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct KelompokQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Case-insensitive name search
    pub search: Option<String>,
    /// Only kelompok of this desa
    pub desa_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl KelompokQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}

/// Request DTO for creating or updating a kelompok
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertKelompokDto {
    pub desa_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Kelompok Godean 1")]
    pub name: String,
}

/// Response DTO for kelompok data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KelompokResponseDto {
    pub id: Uuid,
    pub desa_id: Uuid,
    pub desa_name: String,
    pub name: String,
    pub generus_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Kelompok> for KelompokResponseDto {
    fn from(k: Kelompok) -> Self {
        Self {
            id: k.id,
            desa_id: k.desa_id,
            desa_name: k.desa_name,
            name: k.name,
            generus_count: k.generus_count,
            created_at: k.created_at,
            updated_at: k.updated_at,
        }
    }
}
