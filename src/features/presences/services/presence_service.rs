use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::config::CheckinConfig;
use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, NewAuditLog};
use crate::features::audit_logs::AuditRecorder;
use crate::features::events::models::Event;
use crate::features::presences::dtos::CheckIn;
use crate::features::presences::eligibility::{self, EligibilityDecision};
use crate::features::presences::geolocation::GeolocationReport;
use crate::features::presences::models::{
    InvalidatedView, Presence, PresenceCounts, PresenceRecord, RosterEntry,
};
use crate::features::presences::repository::{PresenceRepository, DUPLICATE_PRESENCE_MESSAGE};
use crate::shared::constants::PUBLIC_ACTOR;

const ENTITY_TYPE: &str = "presence";

/// A stored check-in and the read models it made stale
#[derive(Debug, Clone)]
pub struct RecordedPresence {
    pub presence: Presence,
    pub invalidates: Vec<InvalidatedView>,
    pub message: String,
}

/// Service for the public check-in flow and presence administration
pub struct PresenceService {
    repository: Arc<dyn PresenceRepository>,
    audit: Arc<dyn AuditRecorder>,
    checkin: CheckinConfig,
}

impl PresenceService {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        audit: Arc<dyn AuditRecorder>,
        checkin: CheckinConfig,
    ) -> Self {
        Self {
            repository,
            audit,
            checkin,
        }
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        self.repository
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    /// Run the eligibility gate for a device against an event, as of now
    pub async fn eligibility(
        &self,
        event_id: Uuid,
        report: &GeolocationReport,
    ) -> Result<EligibilityDecision> {
        let event = self.get_event(event_id).await?;
        Ok(self.evaluate(&event, report))
    }

    pub async fn roster(
        &self,
        event_id: Uuid,
        kelompok_id: Option<Uuid>,
    ) -> Result<Vec<RosterEntry>> {
        self.get_event(event_id).await?;
        self.repository.roster(event_id, kelompok_id).await
    }

    pub async fn counts(&self, event_id: Uuid) -> Result<PresenceCounts> {
        self.get_event(event_id).await?;
        let tally = self.repository.tally(event_id).await?;
        Ok(tally.into())
    }

    /// Record one attendance for (event, generus).
    ///
    /// At most one presence exists per pair: an existing record is reported
    /// as `Conflict` before inserting, and the unique index turns a lost race
    /// into the same error.
    pub async fn record_attendance(&self, check_in: CheckIn) -> Result<RecordedPresence> {
        let CheckIn {
            event_id,
            generus_id,
            status,
            location,
        } = check_in;

        let event = self.get_event(event_id).await?;

        if !self.repository.generus_exists(generus_id).await? {
            return Err(AppError::NotFound(format!(
                "Generus {} not found",
                generus_id
            )));
        }

        if self.checkin.enforce_geofence {
            let report = location.unwrap_or_else(GeolocationReport::unavailable);
            let decision = self.evaluate(&event, &report);
            if !decision.allowed {
                tracing::info!(
                    "Check-in blocked: event_id={}, generus_id={}, reason={:?}, distance_km={:?}",
                    event_id,
                    generus_id,
                    decision.reason,
                    decision.distance_km
                );
                return Err(AppError::CheckinRejected(decision.message));
            }
        }

        if self
            .repository
            .presence_exists(event_id, generus_id)
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_PRESENCE_MESSAGE.to_string()));
        }

        let presence = self.repository.insert(event_id, generus_id, status).await?;

        tracing::info!(
            "Presence recorded: id={}, event_id={}, generus_id={}, status={}",
            presence.id,
            event_id,
            generus_id,
            status
        );
        self.audit
            .record_or_log(
                NewAuditLog::new(PUBLIC_ACTOR, AuditAction::CheckIn, ENTITY_TYPE, presence.id)
                    .with_details(serde_json::json!({
                        "eventId": event_id,
                        "generusId": generus_id,
                        "status": status,
                        "location": location,
                    })),
            )
            .await;

        Ok(RecordedPresence {
            message: format!("Presensi berhasil disimpan dengan status {}", status),
            invalidates: InvalidatedView::for_event(event_id),
            presence,
        })
    }

    /// Returns (records, total_count)
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PresenceRecord>, i64)> {
        self.get_event(event_id).await?;
        self.repository.list_for_event(event_id, offset, limit).await
    }

    /// Remove a presence so the member can check in again
    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<Vec<InvalidatedView>> {
        let presence = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Presence {} not found", id)))?;

        tracing::info!(
            "Presence deleted: id={}, event_id={}, generus_id={}",
            id,
            presence.event_id,
            presence.generus_id
        );
        self.audit
            .record_or_log(
                NewAuditLog::new(actor, AuditAction::Delete, ENTITY_TYPE, id).with_details(
                    serde_json::json!({
                        "eventId": presence.event_id,
                        "generusId": presence.generus_id,
                        "status": presence.status,
                    }),
                ),
            )
            .await;

        Ok(InvalidatedView::for_event(presence.event_id))
    }

    fn evaluate(&self, event: &Event, report: &GeolocationReport) -> EligibilityDecision {
        eligibility::evaluate(
            event.status_at(Utc::now()),
            report,
            event.location(),
            self.checkin.radius_km,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::presences::dtos::CheckIn;
    use crate::features::presences::geolocation::GeolocationOutcome;
    use crate::features::presences::models::PresenceStatus;
    use crate::shared::geo::Coordinates;
    use crate::shared::test_helpers::{
        active_event_at, InMemoryPresenceRepository, MemoryAuditRecorder,
    };
    use chrono::Duration;

    struct Fixture {
        service: PresenceService,
        repository: Arc<InMemoryPresenceRepository>,
        audit: Arc<MemoryAuditRecorder>,
        event_id: Uuid,
        generus_id: Uuid,
    }

    async fn fixture(checkin: CheckinConfig) -> Fixture {
        let repository = Arc::new(InMemoryPresenceRepository::default());
        let audit = Arc::new(MemoryAuditRecorder::default());

        let event = active_event_at(-7.0, 110.0);
        let event_id = event.id;
        repository.add_event(event).await;
        let generus_id = repository.add_generus("Kelompok Timur").await;

        let service = PresenceService::new(repository.clone(), audit.clone(), checkin);
        Fixture {
            service,
            repository,
            audit,
            event_id,
            generus_id,
        }
    }

    fn near() -> Option<GeolocationReport> {
        Some(GeolocationOutcome::Acquired(Coordinates::new(-7.005, 110.0)).into())
    }

    fn far() -> Option<GeolocationReport> {
        Some(GeolocationOutcome::Acquired(Coordinates::new(-7.020, 110.0)).into())
    }

    fn check_in(f: &Fixture, status: PresenceStatus, location: Option<GeolocationReport>) -> CheckIn {
        CheckIn {
            event_id: f.event_id,
            generus_id: f.generus_id,
            status,
            location,
        }
    }

    #[tokio::test]
    async fn test_record_hadir_increments_count() {
        let f = fixture(CheckinConfig::default()).await;
        let before = f.service.counts(f.event_id).await.unwrap();

        let recorded = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Present, near()))
            .await
            .unwrap();

        let after = f.service.counts(f.event_id).await.unwrap();
        assert_eq!(after.hadir, before.hadir + 1);
        assert_eq!(after.total, before.total + 1);
        assert_eq!(recorded.presence.status, PresenceStatus::Present);
        assert_eq!(recorded.invalidates, InvalidatedView::for_event(f.event_id));
        assert!(recorded.message.contains("Hadir"));
    }

    #[tokio::test]
    async fn test_izin_disables_member_on_roster() {
        let f = fixture(CheckinConfig::default()).await;

        let decision = f
            .service
            .eligibility(f.event_id, &near().unwrap())
            .await
            .unwrap();
        assert!(decision.allowed);

        f.service
            .record_attendance(check_in(&f, PresenceStatus::Excused, near()))
            .await
            .unwrap();

        let roster = f.service.roster(f.event_id, None).await.unwrap();
        let entry = roster
            .iter()
            .find(|e| e.generus_id == f.generus_id)
            .unwrap();
        assert!(entry.is_disabled);

        let counts = f.service.counts(f.event_id).await.unwrap();
        assert_eq!(counts.izin, 1);
        assert_eq!(counts.percentage.izin, 100.0);
    }

    #[tokio::test]
    async fn test_out_of_radius_rejected_without_record() {
        let f = fixture(CheckinConfig::default()).await;

        let err = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Present, far()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CheckinRejected(_)));
        assert_eq!(f.repository.presence_count().await, 0);
        assert!(f.audit.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_location_rejected_when_enforced() {
        let f = fixture(CheckinConfig::default()).await;

        let err = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Present, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CheckinRejected(_)));
    }

    #[tokio::test]
    async fn test_geofence_not_enforced() {
        let f = fixture(CheckinConfig {
            enforce_geofence: false,
            ..CheckinConfig::default()
        })
        .await;

        let recorded = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Absent, far()))
            .await;
        assert!(recorded.is_ok());
        assert_eq!(f.service.counts(f.event_id).await.unwrap().alpha, 1);
    }

    #[tokio::test]
    async fn test_duplicate_submission_conflicts() {
        let f = fixture(CheckinConfig::default()).await;

        f.service
            .record_attendance(check_in(&f, PresenceStatus::Present, near()))
            .await
            .unwrap();
        let before = f.service.counts(f.event_id).await.unwrap();

        let err = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Excused, near()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(f.service.counts(f.event_id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_event_and_generus() {
        let f = fixture(CheckinConfig::default()).await;

        let mut unknown_event = check_in(&f, PresenceStatus::Present, near());
        unknown_event.event_id = Uuid::new_v4();
        assert!(matches!(
            f.service.record_attendance(unknown_event).await,
            Err(AppError::NotFound(_))
        ));

        let mut unknown_generus = check_in(&f, PresenceStatus::Present, near());
        unknown_generus.generus_id = Uuid::new_v4();
        assert!(matches!(
            f.service.record_attendance(unknown_generus).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_event_not_started_rejected() {
        let f = fixture(CheckinConfig::default()).await;
        let mut upcoming = active_event_at(-7.0, 110.0);
        upcoming.start_date = Utc::now() + Duration::hours(1);
        upcoming.end_date = Utc::now() + Duration::hours(2);
        let upcoming_id = upcoming.id;
        f.repository.add_event(upcoming).await;

        let mut submission = check_in(&f, PresenceStatus::Present, near());
        submission.event_id = upcoming_id;
        assert!(matches!(
            f.service.record_attendance(submission).await,
            Err(AppError::CheckinRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_check_in_is_audited() {
        let f = fixture(CheckinConfig::default()).await;
        let recorded = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Present, near()))
            .await
            .unwrap();

        let entries = f.audit.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, PUBLIC_ACTOR);
        assert_eq!(entries[0].action, AuditAction::CheckIn);
        assert_eq!(entries[0].entity_id, Some(recorded.presence.id));
    }

    #[tokio::test]
    async fn test_delete_allows_new_check_in() {
        let f = fixture(CheckinConfig::default()).await;
        let recorded = f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Present, near()))
            .await
            .unwrap();

        let invalidated = f
            .service
            .delete(recorded.presence.id, "admin-1")
            .await
            .unwrap();
        assert_eq!(invalidated, InvalidatedView::for_event(f.event_id));

        assert!(f
            .service
            .record_attendance(check_in(&f, PresenceStatus::Excused, near()))
            .await
            .is_ok());
        assert!(matches!(
            f.service.delete(Uuid::new_v4(), "admin-1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_roster_filtered_by_kelompok() {
        let f = fixture(CheckinConfig::default()).await;
        let other = f.repository.add_generus("Kelompok Barat").await;
        let kelompok_id = f.repository.kelompok_of(other).await.unwrap();

        let roster = f
            .service
            .roster(f.event_id, Some(kelompok_id))
            .await
            .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].generus_id, other);
        assert!(!roster[0].is_disabled);

        assert!(matches!(
            f.service.roster(Uuid::new_v4(), None).await,
            Err(AppError::NotFound(_))
        ));
    }
}
