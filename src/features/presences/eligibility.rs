//! Decides whether a device may check in to an event.
//!
//! The event window is checked before the location, so a closed event is
//! reported as such no matter where the device is.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::events::models::EventStatus;
use crate::features::presences::geolocation::GeolocationReport;
use crate::shared::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityReason {
    Allowed,
    EventNotStarted,
    EventEnded,
    LocationUnavailable,
    LocationDisabled,
    OutOfRadius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDecision {
    pub allowed: bool,
    pub reason: EligibilityReason,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub radius_km: f64,
    /// Whether a new location read could change the outcome
    pub can_retry_location: bool,
    pub event_status: EventStatus,
}

pub fn evaluate(
    event_status: EventStatus,
    report: &GeolocationReport,
    event_location: Coordinates,
    radius_km: f64,
) -> EligibilityDecision {
    let blocked = |reason: EligibilityReason, message: String, can_retry_location: bool| {
        EligibilityDecision {
            allowed: false,
            reason,
            message,
            distance_km: None,
            radius_km,
            can_retry_location,
            event_status,
        }
    };

    match event_status {
        EventStatus::NotStarted => {
            return blocked(
                EligibilityReason::EventNotStarted,
                "Acara belum dimulai. Presensi dibuka saat acara berlangsung.".to_string(),
                false,
            )
        }
        EventStatus::Ended => {
            return blocked(
                EligibilityReason::EventEnded,
                "Acara telah berakhir. Presensi sudah ditutup.".to_string(),
                false,
            )
        }
        EventStatus::Active => {}
    }

    if !report.is_available {
        return blocked(
            EligibilityReason::LocationUnavailable,
            "Lokasi tidak tersedia. Pastikan GPS aktif lalu coba lagi.".to_string(),
            true,
        );
    }

    if !report.is_enabled {
        return blocked(
            EligibilityReason::LocationDisabled,
            "Izin lokasi ditolak. Aktifkan akses lokasi di browser lalu coba lagi.".to_string(),
            true,
        );
    }

    let Some(device) = report.coordinates else {
        return blocked(
            EligibilityReason::LocationUnavailable,
            "Lokasi belum didapatkan. Silakan coba lagi.".to_string(),
            true,
        );
    };

    let distance = event_location.distance_km_to(&device);

    if distance > radius_km {
        return EligibilityDecision {
            distance_km: Some(distance),
            ..blocked(
                EligibilityReason::OutOfRadius,
                format!(
                    "Anda berada {:.2} km dari lokasi acara. Presensi hanya dapat dilakukan dalam radius {} km.",
                    distance, radius_km
                ),
                true,
            )
        };
    }

    EligibilityDecision {
        allowed: true,
        reason: EligibilityReason::Allowed,
        message: format!(
            "Anda berada {:.2} km dari lokasi acara. Silakan isi presensi.",
            distance
        ),
        distance_km: Some(distance),
        radius_km,
        can_retry_location: false,
        event_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::presences::geolocation::GeolocationOutcome;

    const RADIUS_KM: f64 = 1.0;

    fn event_location() -> Coordinates {
        Coordinates::new(-7.0, 110.0)
    }

    fn at(latitude: f64, longitude: f64) -> GeolocationReport {
        GeolocationOutcome::Acquired(Coordinates::new(latitude, longitude)).into()
    }

    #[test]
    fn test_active_within_radius_allowed() {
        // ~0.5 km north of the event
        let decision = evaluate(
            EventStatus::Active,
            &at(-6.9955, 110.0),
            event_location(),
            RADIUS_KM,
        );
        assert!(decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::Allowed);
        let distance = decision.distance_km.unwrap();
        assert!((distance - 0.5).abs() < 0.01, "distance was {}", distance);
    }

    #[test]
    fn test_active_outside_radius_blocked() {
        // ~1.5 km north of the event
        let decision = evaluate(
            EventStatus::Active,
            &at(-6.9865, 110.0),
            event_location(),
            RADIUS_KM,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::OutOfRadius);
        assert!(decision.can_retry_location);
        assert!(decision.distance_km.unwrap() > RADIUS_KM);
    }

    #[test]
    fn test_not_started_blocks_regardless_of_distance() {
        let decision = evaluate(
            EventStatus::NotStarted,
            &at(-7.0, 110.0),
            event_location(),
            RADIUS_KM,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::EventNotStarted);
        assert!(decision.distance_km.is_none());
        assert!(!decision.can_retry_location);
    }

    #[test]
    fn test_ended_ignores_missing_location() {
        let decision = evaluate(
            EventStatus::Ended,
            &GeolocationReport::unavailable(),
            event_location(),
            RADIUS_KM,
        );
        assert_eq!(decision.reason, EligibilityReason::EventEnded);
        assert!(!decision.can_retry_location);
    }

    #[test]
    fn test_unavailable_location_offers_retry() {
        let decision = evaluate(
            EventStatus::Active,
            &GeolocationReport::unavailable(),
            event_location(),
            RADIUS_KM,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::LocationUnavailable);
        assert!(decision.can_retry_location);
    }

    #[test]
    fn test_denied_location_offers_retry() {
        let decision = evaluate(
            EventStatus::Active,
            &GeolocationOutcome::Denied.into(),
            event_location(),
            RADIUS_KM,
        );
        assert_eq!(decision.reason, EligibilityReason::LocationDisabled);
        assert!(decision.can_retry_location);
    }

    #[test]
    fn test_enabled_report_without_coordinates() {
        let report = GeolocationReport {
            coordinates: None,
            is_available: true,
            is_enabled: true,
        };
        let decision = evaluate(EventStatus::Active, &report, event_location(), RADIUS_KM);
        assert_eq!(decision.reason, EligibilityReason::LocationUnavailable);
    }

    #[test]
    fn test_scenario_device_near_event() {
        let decision = evaluate(
            EventStatus::Active,
            &at(-7.005, 110.0),
            event_location(),
            RADIUS_KM,
        );
        assert!(decision.allowed);
    }

    #[test]
    fn test_scenario_device_far_from_event() {
        let decision = evaluate(
            EventStatus::Active,
            &at(-7.020, 110.0),
            event_location(),
            RADIUS_KM,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.reason, EligibilityReason::OutOfRadius);
        assert!(decision.message.contains("2.22 km"));
    }

    #[test]
    fn test_decision_wire_shape() {
        let decision = evaluate(
            EventStatus::Active,
            &at(-7.005, 110.0),
            event_location(),
            RADIUS_KM,
        );
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["reason"], "allowed");
        assert_eq!(json["eventStatus"], "active");
        assert_eq!(json["canRetryLocation"], false);
        assert!(json["distanceKm"].is_number());
    }
}
