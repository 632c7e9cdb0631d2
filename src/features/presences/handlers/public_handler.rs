use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::events::dtos::PublicEventDto;
use crate::features::presences::dtos::{
    CheckIn, CreatePresenceDto, RecordedPresenceDto, RosterEntryDto, RosterQuery,
};
use crate::features::presences::eligibility::EligibilityDecision;
use crate::features::presences::geolocation::GeolocationReport;
use crate::features::presences::models::PresenceCounts;
use crate::features::presences::services::PresenceService;
use crate::shared::types::ApiResponse;

/// Get an event for the check-in page
#[utoipa::path(
    get,
    path = "/api/public/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event with its current status", body = ApiResponse<PublicEventDto>),
        (status = 404, description = "Event not found")
    ),
    tag = "check-in"
)]
pub async fn get_public_event(
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PublicEventDto>>> {
    let event = service.get_event(id).await?;
    Ok(Json(ApiResponse::success(
        Some(PublicEventDto::from_event(event, Utc::now())),
        None,
        None,
    )))
}

/// List members for the check-in form
#[utoipa::path(
    get,
    path = "/api/public/events/{id}/roster",
    params(("id" = Uuid, Path, description = "Event ID"), RosterQuery),
    responses(
        (status = 200, description = "Roster; members already recorded are disabled", body = ApiResponse<Vec<RosterEntryDto>>),
        (status = 404, description = "Event not found")
    ),
    tag = "check-in"
)]
pub async fn get_roster(
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<RosterQuery>,
) -> Result<Json<ApiResponse<Vec<RosterEntryDto>>>> {
    let roster = service.roster(id, query.kelompok_id).await?;
    let dtos: Vec<RosterEntryDto> = roster.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Attendance totals for an event
#[utoipa::path(
    get,
    path = "/api/public/events/{id}/counts",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Counts per status", body = ApiResponse<PresenceCounts>),
        (status = 404, description = "Event not found")
    ),
    tag = "check-in"
)]
pub async fn get_counts(
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PresenceCounts>>> {
    let counts = service.counts(id).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

/// Check whether a device may check in right now
#[utoipa::path(
    post,
    path = "/api/public/events/{id}/eligibility",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = GeolocationReport,
    responses(
        (status = 200, description = "Eligibility decision", body = ApiResponse<EligibilityDecision>),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Event not found")
    ),
    tag = "check-in"
)]
pub async fn check_eligibility(
    State(service): State<Arc<PresenceService>>,
    Path(id): Path<Uuid>,
    AppJson(report): AppJson<GeolocationReport>,
) -> Result<Json<ApiResponse<EligibilityDecision>>> {
    report
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let decision = service.eligibility(id, &report).await?;
    let message = decision.message.clone();
    Ok(Json(ApiResponse::success(Some(decision), Some(message), None)))
}

/// Submit attendance for one member
#[utoipa::path(
    post,
    path = "/api/public/presences",
    request_body = CreatePresenceDto,
    responses(
        (status = 201, description = "Presence recorded", body = ApiResponse<RecordedPresenceDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Check-in not allowed (event window or location)"),
        (status = 404, description = "Event or generus not found"),
        (status = 409, description = "Member already recorded for this event")
    ),
    tag = "check-in"
)]
pub async fn create_presence(
    State(service): State<Arc<PresenceService>>,
    AppJson(dto): AppJson<CreatePresenceDto>,
) -> Result<(StatusCode, Json<ApiResponse<RecordedPresenceDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let check_in = CheckIn::try_from(dto)?;

    let recorded = service.record_attendance(check_in).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(RecordedPresenceDto {
                presence: recorded.presence.into(),
                invalidates: recorded.invalidates,
            }),
            Some(recorded.message),
            None,
        )),
    ))
}
