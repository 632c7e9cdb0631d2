use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Desa model, the village-level grouping of kelompok
#[derive(Debug, Clone, FromRow)]
pub struct Desa {
    pub id: Uuid,
    pub name: String,
    pub kelompok_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
