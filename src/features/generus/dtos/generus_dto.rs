use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::generus::models::{Gender, Generus};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::PHONE_REGEX;

/// Query parameters for listing generus
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct GenerusQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Case-insensitive name search
    pub search: Option<String>,
    /// Only generus of this kelompok
    pub kelompok_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl GenerusQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}

/// Request DTO for creating or updating a generus
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGenerusDto {
    pub kelompok_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Ahmad Fauzi")]
    pub name: String,

    pub gender: Gender,

    pub birth_date: Option<NaiveDate>,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 8-15 digits, optionally prefixed with +"))]
    #[schema(example = "081234567890")]
    pub phone: Option<String>,
}

/// Response DTO for generus data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerusResponseDto {
    pub id: Uuid,
    pub kelompok_id: Uuid,
    pub kelompok_name: String,
    pub desa_name: String,
    pub name: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Generus> for GenerusResponseDto {
    fn from(g: Generus) -> Self {
        Self {
            id: g.id,
            kelompok_id: g.kelompok_id,
            kelompok_name: g.kelompok_name,
            desa_name: g.desa_name,
            name: g.name,
            gender: g.gender,
            birth_date: g.birth_date,
            phone: g.phone,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}
