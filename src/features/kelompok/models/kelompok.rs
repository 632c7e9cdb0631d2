use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Kelompok model, a sub-group of generus inside a desa
#[derive(Debug, Clone, FromRow)]
pub struct Kelompok {
    pub id: Uuid,
    pub desa_id: Uuid,
    pub desa_name: String,
    pub name: String,
    pub generus_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
