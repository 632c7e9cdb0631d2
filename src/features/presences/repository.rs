use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::{is_foreign_key_violation, is_unique_violation};
use crate::core::error::{AppError, Result};
use crate::features::events::models::Event;
use crate::features::presences::models::{
    Presence, PresenceRecord, PresenceStatus, RosterEntry, StatusTally,
};

pub const DUPLICATE_PRESENCE_MESSAGE: &str = "Generus ini sudah melakukan presensi untuk acara ini";

/// Storage operations behind the check-in flow
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>>;

    async fn generus_exists(&self, generus_id: Uuid) -> Result<bool>;

    async fn presence_exists(&self, event_id: Uuid, generus_id: Uuid) -> Result<bool>;

    /// Insert a presence; a concurrent duplicate surfaces as `Conflict`
    async fn insert(
        &self,
        event_id: Uuid,
        generus_id: Uuid,
        status: PresenceStatus,
    ) -> Result<Presence>;

    async fn tally(&self, event_id: Uuid) -> Result<StatusTally>;

    /// Every generus, optionally within one kelompok, flagged when already present
    async fn roster(&self, event_id: Uuid, kelompok_id: Option<Uuid>)
        -> Result<Vec<RosterEntry>>;

    /// Returns (records, total_count)
    async fn list_for_event(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PresenceRecord>, i64)>;

    /// Returns the removed record, `None` when nothing matched
    async fn delete(&self, id: Uuid) -> Result<Option<Presence>>;
}

pub struct PgPresenceRepository {
    pool: PgPool,
}

impl PgPresenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceRepository for PgPresenceRepository {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, start_date, end_date, latitude, longitude,
                   created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch event {}: {:?}", event_id, e);
            AppError::Database(e)
        })
    }

    async fn generus_exists(&self, generus_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM generus WHERE id = $1)")
            .bind(generus_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up generus {}: {:?}", generus_id, e);
                AppError::Database(e)
            })
    }

    async fn presence_exists(&self, event_id: Uuid, generus_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM presences WHERE event_id = $1 AND generus_id = $2)",
        )
        .bind(event_id)
        .bind(generus_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to check presence: event_id={}, generus_id={}, error={:?}",
                event_id,
                generus_id,
                e
            );
            AppError::Database(e)
        })
    }

    async fn insert(
        &self,
        event_id: Uuid,
        generus_id: Uuid,
        status: PresenceStatus,
    ) -> Result<Presence> {
        sqlx::query_as::<_, Presence>(
            r#"
            INSERT INTO presences (event_id, generus_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, generus_id, status, created_at
            "#,
        )
        .bind(event_id)
        .bind(generus_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict(DUPLICATE_PRESENCE_MESSAGE.to_string());
            }
            if is_foreign_key_violation(&e) {
                return AppError::NotFound("Acara atau generus tidak ditemukan".to_string());
            }
            tracing::error!("Failed to insert presence: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn tally(&self, event_id: Uuid) -> Result<StatusTally> {
        let (hadir, izin, alpha) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'present'),
                COUNT(*) FILTER (WHERE status = 'excused'),
                COUNT(*) FILTER (WHERE status = 'absent')
            FROM presences
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count presences for event {}: {:?}", event_id, e);
            AppError::Database(e)
        })?;

        Ok(StatusTally { hadir, izin, alpha })
    }

    async fn roster(
        &self,
        event_id: Uuid,
        kelompok_id: Option<Uuid>,
    ) -> Result<Vec<RosterEntry>> {
        sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT g.id AS generus_id, g.name AS generus_name, k.name AS kelompok_name,
                   EXISTS(
                       SELECT 1 FROM presences p
                       WHERE p.event_id = $1 AND p.generus_id = g.id
                   ) AS is_disabled
            FROM generus g
            JOIN kelompok k ON k.id = g.kelompok_id
            WHERE ($2::uuid IS NULL OR g.kelompok_id = $2)
            ORDER BY k.name ASC, g.name ASC
            "#,
        )
        .bind(event_id)
        .bind(kelompok_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch roster for event {}: {:?}", event_id, e);
            AppError::Database(e)
        })
    }

    async fn list_for_event(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PresenceRecord>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM presences WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count presences: {:?}", e);
                    AppError::Database(e)
                })?;

        let items = sqlx::query_as::<_, PresenceRecord>(
            r#"
            SELECT p.id, p.event_id, p.generus_id, g.name AS generus_name,
                   k.name AS kelompok_name, p.status, p.created_at
            FROM presences p
            JOIN generus g ON g.id = p.generus_id
            JOIN kelompok k ON k.id = g.kelompok_id
            WHERE p.event_id = $1
            ORDER BY p.created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(event_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch presences: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Presence>> {
        sqlx::query_as::<_, Presence>(
            r#"
            DELETE FROM presences
            WHERE id = $1
            RETURNING id, event_id, generus_id, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete presence {}: {:?}", id, e);
            AppError::Database(e)
        })
    }
}
