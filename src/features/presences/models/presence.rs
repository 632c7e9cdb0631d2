use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Attendance status. Stored as the `presence_status` enum, exchanged with
/// clients as "Hadir" / "Izin" / "Tidak Hadir".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "presence_status", rename_all = "snake_case")]
pub enum PresenceStatus {
    #[serde(rename = "Hadir")]
    Present,
    #[serde(rename = "Izin")]
    Excused,
    #[serde(rename = "Tidak Hadir")]
    Absent,
}

impl PresenceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PresenceStatus::Present => "Hadir",
            PresenceStatus::Excused => "Izin",
            PresenceStatus::Absent => "Tidak Hadir",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Database model for presence
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Presence {
    pub id: Uuid,
    pub event_id: Uuid,
    pub generus_id: Uuid,
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

/// Presence joined with the member it belongs to (back-office listing)
#[derive(Debug, Clone, FromRow)]
pub struct PresenceRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub generus_id: Uuid,
    pub generus_name: String,
    pub kelompok_name: String,
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

/// A member offered on the check-in form
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RosterEntry {
    pub generus_id: Uuid,
    pub generus_name: String,
    pub kelompok_name: String,
    /// Already has a presence for the event
    pub is_disabled: bool,
}

/// Raw per-status totals for one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub hadir: i64,
    pub izin: i64,
    pub alpha: i64,
}

impl StatusTally {
    pub fn total(&self) -> i64 {
        self.hadir + self.izin + self.alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PresencePercentage {
    pub hadir: f64,
    pub izin: f64,
    pub alpha: f64,
}

/// Attendance summary for an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PresenceCounts {
    pub hadir: i64,
    pub izin: i64,
    pub alpha: i64,
    pub total: i64,
    pub percentage: PresencePercentage,
}

impl From<StatusTally> for PresenceCounts {
    fn from(tally: StatusTally) -> Self {
        let total = tally.total();
        Self {
            hadir: tally.hadir,
            izin: tally.izin,
            alpha: tally.alpha,
            total,
            percentage: PresencePercentage {
                hadir: percentage(tally.hadir, total),
                izin: percentage(tally.izin, total),
                alpha: percentage(tally.alpha, total),
            },
        }
    }
}

/// Share of `total` in percent, two decimals; 0 for an empty event
fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round() / 100.0
}

/// Read model that must be refetched after a presence is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidatedView {
    Roster(Uuid),
    Counts(Uuid),
}

impl InvalidatedView {
    pub fn for_event(event_id: Uuid) -> Vec<InvalidatedView> {
        vec![
            InvalidatedView::Roster(event_id),
            InvalidatedView::Counts(event_id),
        ]
    }
}

impl std::fmt::Display for InvalidatedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidatedView::Roster(id) => write!(f, "roster:{}", id),
            InvalidatedView::Counts(id) => write!(f, "counts:{}", id),
        }
    }
}

impl Serialize for InvalidatedView {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
