use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::geo::Coordinates;

/// Temporal state of an event, derived from its window on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    NotStarted,
    Active,
    Ended,
}

impl EventStatus {
    /// Classify `now` against the inclusive window `[start, end]`
    pub fn resolve(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            EventStatus::NotStarted
        } else if now > end {
            EventStatus::Ended
        } else {
            EventStatus::Active
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::NotStarted => write!(f, "not_started"),
            EventStatus::Active => write!(f, "active"),
            EventStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Database model for event
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::resolve(now, self.start_date, self.end_date)
    }

    pub fn location(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_not_started() {
        let now = Utc::now();
        let status = EventStatus::resolve(now, now + Duration::hours(1), now + Duration::hours(2));
        assert_eq!(status, EventStatus::NotStarted);
    }

    #[test]
    fn test_active() {
        let now = Utc::now();
        let status = EventStatus::resolve(now, now - Duration::hours(1), now + Duration::hours(1));
        assert_eq!(status, EventStatus::Active);
    }

    #[test]
    fn test_ended() {
        let now = Utc::now();
        let status = EventStatus::resolve(now, now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(status, EventStatus::Ended);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        assert_eq!(EventStatus::resolve(start, start, end), EventStatus::Active);
        assert_eq!(EventStatus::resolve(end, start, end), EventStatus::Active);
        assert_eq!(
            EventStatus::resolve(end + Duration::seconds(1), start, end),
            EventStatus::Ended
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(EventStatus::Ended.to_string(), "ended");
    }
}
