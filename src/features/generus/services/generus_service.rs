use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::is_foreign_key_violation;
use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, NewAuditLog};
use crate::features::audit_logs::AuditRecorder;
use crate::features::generus::dtos::UpsertGenerusDto;
use crate::features::generus::models::Generus;

const ENTITY_TYPE: &str = "generus";

const SELECT_GENERUS: &str = r#"
    SELECT g.id, g.kelompok_id, k.name AS kelompok_name, d.name AS desa_name,
           g.name, g.gender, g.birth_date, g.phone, g.created_at, g.updated_at
    FROM generus g
    JOIN kelompok k ON k.id = g.kelompok_id
    JOIN desa d ON d.id = k.desa_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR LOWER(g.name) LIKE $1)
    AND ($2::uuid IS NULL OR g.kelompok_id = $2)
"#;

/// Service for managing generus
pub struct GenerusService {
    pool: PgPool,
    audit: Arc<dyn AuditRecorder>,
}

impl GenerusService {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { pool, audit }
    }

    /// List generus ordered by name
    /// Returns (generus, total_count)
    pub async fn list(
        &self,
        search: Option<&str>,
        kelompok_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Generus>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM generus g {}",
            LIST_FILTER
        ))
        .bind(search)
        .bind(kelompok_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count generus: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Generus>(&format!(
            "{} {} ORDER BY g.name ASC OFFSET $3 LIMIT $4",
            SELECT_GENERUS, LIST_FILTER
        ))
        .bind(search)
        .bind(kelompok_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch generus: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Generus> {
        sqlx::query_as::<_, Generus>(&format!("{} WHERE g.id = $1", SELECT_GENERUS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch generus {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Generus {} not found", id)))
    }

    pub async fn create(&self, dto: UpsertGenerusDto, actor: &str) -> Result<Generus> {
        let name = dto.name.trim().to_string();

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO generus (kelompok_id, name, gender, birth_date, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(dto.kelompok_id)
        .bind(&name)
        .bind(dto.gender)
        .bind(dto.birth_date)
        .bind(&dto.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, dto.kelompok_id))?;

        tracing::info!("Generus created: id={}, kelompok_id={}", id, dto.kelompok_id);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Create, ENTITY_TYPE, id).with_details(
                    serde_json::json!({ "name": name, "kelompokId": dto.kelompok_id }),
                ),
            )
            .await;

        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpsertGenerusDto, actor: &str) -> Result<Generus> {
        let name = dto.name.trim().to_string();

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE generus
            SET kelompok_id = $2, name = $3, gender = $4, birth_date = $5, phone = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.kelompok_id)
        .bind(&name)
        .bind(dto.gender)
        .bind(dto.birth_date)
        .bind(&dto.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, dto.kelompok_id))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Generus {} not found", id)));
        }

        tracing::info!("Generus updated: id={}", id);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Update, ENTITY_TYPE, id).with_details(
                    serde_json::json!({ "name": name, "kelompokId": dto.kelompok_id }),
                ),
            )
            .await;

        self.get(id).await
    }

    /// Delete a generus together with their presence records
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM generus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete generus {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Generus {} not found", id)));
        }

        tracing::info!("Generus deleted: id={}", id);
        self.audit
            .record_or_log(NewAuditLog::new(actor, AuditAction::Delete, ENTITY_TYPE, id))
            .await;

        Ok(())
    }
}

fn map_write_error(e: sqlx::Error, kelompok_id: Uuid) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::NotFound(format!("Kelompok {} not found", kelompok_id));
    }
    tracing::error!("Failed to write generus: {:?}", e);
    AppError::Database(e)
}
