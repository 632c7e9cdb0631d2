use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::events::models::{Event, EventStatus};

/// Request DTO for creating or updating an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_event_window"))]
pub struct UpsertEventDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[schema(example = "Pengajian Remaja Desa")]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[schema(example = -7.0)]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    #[schema(example = 110.0)]
    pub longitude: f64,
}

fn validate_event_window(dto: &UpsertEventDto) -> Result<(), ValidationError> {
    if dto.start_date > dto.end_date {
        let mut err = ValidationError::new("event_window");
        err.message = Some("Start date must not be after end date".into());
        return Err(err);
    }
    Ok(())
}

/// Response DTO for event data in the back-office
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponseDto {
    pub fn from_event(event: Event, now: DateTime<Utc>) -> Self {
        let status = event.status_at(now);
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            latitude: event.latitude,
            longitude: event.longitude,
            status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Public view of an event for the check-in page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicEventDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: EventStatus,
}

impl PublicEventDto {
    pub fn from_event(event: Event, now: DateTime<Utc>) -> Self {
        let status = event.status_at(now);
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            latitude: event.latitude,
            longitude: event.longitude,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dto(start: DateTime<Utc>, end: DateTime<Utc>) -> UpsertEventDto {
        UpsertEventDto {
            title: "Pengajian".to_string(),
            description: String::new(),
            start_date: start,
            end_date: end,
            latitude: -7.0,
            longitude: 110.0,
        }
    }

    #[test]
    fn test_valid_window() {
        let now = Utc::now();
        assert!(dto(now, now + Duration::hours(2)).validate().is_ok());
        assert!(dto(now, now).validate().is_ok());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let now = Utc::now();
        assert!(dto(now, now - Duration::minutes(1)).validate().is_err());
    }

    #[test]
    fn test_coordinates_range() {
        let now = Utc::now();
        let mut invalid = dto(now, now + Duration::hours(1));
        invalid.latitude = 91.0;
        assert!(invalid.validate().is_err());

        invalid.latitude = -7.0;
        invalid.longitude = -181.0;
        assert!(invalid.validate().is_err());
    }
}
