use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::AppError;
use crate::features::presences::geolocation::GeolocationReport;
use crate::features::presences::models::{
    InvalidatedView, Presence, PresenceRecord, PresenceStatus, RosterEntry,
};

/// Public check-in submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_ids_not_nil"))]
pub struct CreatePresenceDto {
    #[serde(default)]
    #[validate(required(message = "Acara wajib dipilih"))]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    #[validate(required(message = "Nama generus wajib dipilih"))]
    pub generus_id: Option<Uuid>,
    #[serde(default)]
    #[validate(required(message = "Status kehadiran wajib dipilih"))]
    pub status: Option<PresenceStatus>,
    /// Device location at submission time
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<GeolocationReport>,
}

fn validate_ids_not_nil(dto: &CreatePresenceDto) -> Result<(), ValidationError> {
    if dto.event_id.is_some_and(|id| id.is_nil()) {
        let mut err = ValidationError::new("event_id");
        err.message = Some("Acara wajib dipilih".into());
        return Err(err);
    }
    if dto.generus_id.is_some_and(|id| id.is_nil()) {
        let mut err = ValidationError::new("generus_id");
        err.message = Some("Nama generus wajib dipilih".into());
        return Err(err);
    }
    Ok(())
}

/// Check-in fields after required-field validation
#[derive(Debug, Clone, Copy)]
pub struct CheckIn {
    pub event_id: Uuid,
    pub generus_id: Uuid,
    pub status: PresenceStatus,
    pub location: Option<GeolocationReport>,
}

impl TryFrom<CreatePresenceDto> for CheckIn {
    type Error = AppError;

    fn try_from(dto: CreatePresenceDto) -> Result<Self, Self::Error> {
        match (dto.event_id, dto.generus_id, dto.status) {
            (Some(event_id), Some(generus_id), Some(status)) => Ok(CheckIn {
                event_id,
                generus_id,
                status,
                location: dto.location,
            }),
            _ => Err(AppError::Validation(
                "Acara, nama generus, dan status kehadiran wajib diisi".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponseDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub generus_id: Uuid,
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Presence> for PresenceResponseDto {
    fn from(presence: Presence) -> Self {
        Self {
            id: presence.id,
            event_id: presence.event_id,
            generus_id: presence.generus_id,
            status: presence.status,
            created_at: presence.created_at,
        }
    }
}

/// Result of a successful check-in
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPresenceDto {
    pub presence: PresenceResponseDto,
    /// Read models to refetch, e.g. `roster:<eventId>` and `counts:<eventId>`
    #[schema(value_type = Vec<String>)]
    pub invalidates: Vec<InvalidatedView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryDto {
    pub generus_id: Uuid,
    pub generus_name: String,
    pub kelompok_name: String,
    pub is_disabled: bool,
}

impl From<RosterEntry> for RosterEntryDto {
    fn from(entry: RosterEntry) -> Self {
        Self {
            generus_id: entry.generus_id,
            generus_name: entry.generus_name,
            kelompok_name: entry.kelompok_name,
            is_disabled: entry.is_disabled,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Only members of this kelompok
    pub kelompok_id: Option<Uuid>,
}

/// Presence row in the back-office listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecordDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub generus_id: Uuid,
    pub generus_name: String,
    pub kelompok_name: String,
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

impl From<PresenceRecord> for PresenceRecordDto {
    fn from(record: PresenceRecord) -> Self {
        Self {
            id: record.id,
            event_id: record.event_id,
            generus_id: record.generus_id,
            generus_name: record.generus_name,
            kelompok_name: record.kelompok_name,
            status: record.status,
            created_at: record.created_at,
        }
    }
}
