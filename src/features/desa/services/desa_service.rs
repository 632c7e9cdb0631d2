use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::{is_foreign_key_violation, is_unique_violation};
use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, NewAuditLog};
use crate::features::audit_logs::AuditRecorder;
use crate::features::desa::dtos::UpsertDesaDto;
use crate::features::desa::models::Desa;

const ENTITY_TYPE: &str = "desa";

const SELECT_DESA: &str = r#"
    SELECT d.id, d.name, d.created_at, d.updated_at,
           (SELECT COUNT(*) FROM kelompok k WHERE k.desa_id = d.id) AS kelompok_count
    FROM desa d
"#;

/// Service for managing desa
pub struct DesaService {
    pool: PgPool,
    audit: Arc<dyn AuditRecorder>,
}

impl DesaService {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { pool, audit }
    }

    /// List desa ordered by name with optional search
    /// Returns (desa, total_count)
    pub async fn list(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Desa>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM desa WHERE ($1::text IS NULL OR LOWER(name) LIKE $1)",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count desa: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Desa>(&format!(
            "{} WHERE ($1::text IS NULL OR LOWER(d.name) LIKE $1) ORDER BY d.name ASC OFFSET $2 LIMIT $3",
            SELECT_DESA
        ))
        .bind(search)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch desa: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Desa> {
        sqlx::query_as::<_, Desa>(&format!("{} WHERE d.id = $1", SELECT_DESA))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch desa {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Desa {} not found", id)))
    }

    pub async fn create(&self, dto: UpsertDesaDto, actor: &str) -> Result<Desa> {
        let name = dto.name.trim().to_string();

        let id = sqlx::query_scalar::<_, Uuid>("INSERT INTO desa (name) VALUES ($1) RETURNING id")
            .bind(&name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &name))?;

        tracing::info!("Desa created: id={}, name={}", id, name);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Create, ENTITY_TYPE, id)
                    .with_details(serde_json::json!({ "name": name })),
            )
            .await;

        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpsertDesaDto, actor: &str) -> Result<Desa> {
        let name = dto.name.trim().to_string();

        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE desa SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(&name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &name))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Desa {} not found", id)));
        }

        tracing::info!("Desa updated: id={}, name={}", id, name);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Update, ENTITY_TYPE, id)
                    .with_details(serde_json::json!({ "name": name })),
            )
            .await;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM desa WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::Conflict(
                        "Desa masih memiliki kelompok, hapus kelompok terlebih dahulu".to_string(),
                    );
                }
                tracing::error!("Failed to delete desa {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Desa {} not found", id)));
        }

        tracing::info!("Desa deleted: id={}", id);
        self.audit
            .record_or_log(NewAuditLog::new(actor, AuditAction::Delete, ENTITY_TYPE, id))
            .await;

        Ok(())
    }
}

fn map_write_error(e: sqlx::Error, name: &str) -> AppError {
    if is_unique_violation(&e) {
        return AppError::Conflict(format!("Desa '{}' sudah terdaftar", name));
    }
    tracing::error!("Failed to write desa '{}': {:?}", name, e);
    AppError::Database(e)
}
