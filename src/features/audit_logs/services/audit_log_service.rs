use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditLog, NewAuditLog};

/// Sink for audit entries written by mutating services
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    async fn record(&self, entry: NewAuditLog) -> Result<()>;

    /// Record without failing the caller; the audited change is already committed
    async fn record_or_log(&self, entry: NewAuditLog) {
        let (action, entity_type, entity_id) = (entry.action, entry.entity_type, entry.entity_id);
        if let Err(e) = self.record(entry).await {
            tracing::error!(
                "Failed to write audit log: action={}, entity_type={}, entity_id={:?}, error={}",
                action,
                entity_type,
                entity_id,
                e
            );
        }
    }
}

/// Service for the Postgres-backed audit trail
pub struct AuditLogService {
    pool: PgPool,
}

impl AuditLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List audit entries, newest first
    /// Returns (entries, total_count)
    pub async fn list(
        &self,
        entity_type: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
            "#,
        )
        .bind(entity_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count audit logs: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, actor, action, entity_type, entity_id, details, created_at
            FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(entity_type)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch audit logs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }
}

#[async_trait]
impl AuditRecorder for AuditLogService {
    async fn record(&self, entry: NewAuditLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (actor, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&entry.actor)
        .bind(entry.action.as_str())
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert audit log: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::debug!(
            "Audit: {} {} {} {:?}",
            entry.actor,
            entry.action,
            entry.entity_type,
            entry.entity_id
        );

        Ok(())
    }
}
