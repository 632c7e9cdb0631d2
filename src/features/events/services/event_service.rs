use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, NewAuditLog};
use crate::features::audit_logs::AuditRecorder;
use crate::features::events::dtos::UpsertEventDto;
use crate::features::events::models::Event;

const ENTITY_TYPE: &str = "event";

const SELECT_EVENT: &str = r#"
    SELECT id, title, description, start_date, end_date, latitude, longitude,
           created_at, updated_at
    FROM events
"#;

/// Service for managing events
pub struct EventService {
    pool: PgPool,
    audit: Arc<dyn AuditRecorder>,
}

impl EventService {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditRecorder>) -> Self {
        Self { pool, audit }
    }

    /// List events, latest start first
    /// Returns (events, total_count)
    pub async fn list(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Event>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM events WHERE ($1::text IS NULL OR LOWER(title) LIKE $1)",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count events: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Event>(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR LOWER(title) LIKE $1)
            ORDER BY start_date DESC
            OFFSET $2 LIMIT $3"#,
            SELECT_EVENT
        ))
        .bind(search)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch events: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!("{} WHERE id = $1", SELECT_EVENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch event {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    pub async fn create(&self, dto: UpsertEventDto, actor: &str) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, start_date, end_date, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, start_date, end_date, latitude, longitude,
                      created_at, updated_at
            "#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create event: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Event created: id={}, title={}", event.id, event.title);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Create, ENTITY_TYPE, event.id)
                    .with_details(event_details(&event)),
            )
            .await;

        Ok(event)
    }

    pub async fn update(&self, id: Uuid, dto: UpsertEventDto, actor: &str) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = $2, description = $3, start_date = $4, end_date = $5,
                latitude = $6, longitude = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, start_date, end_date, latitude, longitude,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update event {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        tracing::info!("Event updated: id={}", id);
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Update, ENTITY_TYPE, id)
                    .with_details(event_details(&event)),
            )
            .await;

        Ok(event)
    }

    /// Delete an event together with its presence records
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete event {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }

        tracing::info!("Event deleted: id={}", id);
        self.audit
            .record_or_log(NewAuditLog::new(actor, AuditAction::Delete, ENTITY_TYPE, id))
            .await;

        Ok(())
    }
}

fn event_details(event: &Event) -> serde_json::Value {
    serde_json::json!({
        "title": event.title,
        "startDate": event.start_date,
        "endDate": event.end_date,
        "latitude": event.latitude,
        "longitude": event.longitude,
    })
}
