use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::{is_foreign_key_violation, is_unique_violation};
use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, NewAuditLog};
use crate::features::audit_logs::AuditRecorder;
use crate::features::kelompok::dtos::UpsertKelompokDto;
use crate::features::kelompok::models::Kelompok;

const ENTITY_TYPE: &str = "kelompok";

const SELECT_KELOMPOK: &str = r#"
    SELECT k.id, k.desa_id, d.name AS desa_name, k.name, k.created_at, k.updated_at,
           (SELECT COUNT(*) FROM generus g WHERE g.kelompok_id = k.id) AS generus_count
    FROM kelompok k
    JOIN desa d ON d.id = k.desa_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR LOWER(k.name) LIKE $1)
    AND ($2::uuid IS NULL OR k.desa_id = $2)
"#;

/// Service for managing kelompok
pub struct KelompokService {
    pool: PgPool,
    audit: Arc<dyn AuditRecorder>,
}

impl KelompokService {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { pool, audit }
    }

    /// List kelompok ordered by desa then name
    /// Returns (kelompok, total_count)
    pub async fn list(
        &self,
        search: Option<&str>,
        desa_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Kelompok>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM kelompok k {}",
            LIST_FILTER
        ))
        .bind(search)
        .bind(desa_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count kelompok: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Kelompok>(&format!(
            "{} {} ORDER BY d.name ASC, k.name ASC OFFSET $3 LIMIT $4",
            SELECT_KELOMPOK, LIST_FILTER
        ))
        .bind(search)
        .bind(desa_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch kelompok: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Kelompok> {
        sqlx::query_as::<_, Kelompok>(&format!("{} WHERE k.id = $1", SELECT_KELOMPOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch kelompok {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Kelompok {} not found", id)))
    }

    pub async fn create(&self, dto: UpsertKelompokDto, actor: &str) -> Result<Kelompok> {
        let name = dto.name.trim().to_string();

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO kelompok (desa_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(dto.desa_id)
        .bind(&name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, dto.desa_id, &name))?;

        tracing::info!("Kelompok created: id={}, desa_id={}", id, dto.desa_id);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Create, ENTITY_TYPE, id)
                    .with_details(serde_json::json!({ "name": name, "desaId": dto.desa_id })),
            )
            .await;

        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpsertKelompokDto, actor: &str) -> Result<Kelompok> {
        let name = dto.name.trim().to_string();

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE kelompok SET desa_id = $2, name = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.desa_id)
        .bind(&name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, dto.desa_id, &name))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Kelompok {} not found", id)));
        }

        tracing::info!("Kelompok updated: id={}", id);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Update, ENTITY_TYPE, id)
                    .with_details(serde_json::json!({ "name": name, "desaId": dto.desa_id })),
            )
            .await;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM kelompok WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::Conflict(
                        "Kelompok masih memiliki generus, pindahkan atau hapus generus terlebih dahulu"
                            .to_string(),
                    );
                }
                tracing::error!("Failed to delete kelompok {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Kelompok {} not found", id)));
        }

        tracing::info!("Kelompok deleted: id={}", id);
        self.audit
            .record_or_log(NewAuditLog::new(actor, AuditAction::Delete, ENTITY_TYPE, id))
            .await;

        Ok(())
    }
}

fn map_write_error(e: sqlx::Error, desa_id: Uuid, name: &str) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::NotFound(format!("Desa {} not found", desa_id));
    }
    if is_unique_violation(&e) {
        return AppError::Conflict(format!("Kelompok '{}' sudah terdaftar di desa ini", name));
    }
    tracing::error!("Failed to write kelompok '{}': {:?}", name, e);
    AppError::Database(e)
}
