use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::audit_logs::{dtos as audit_logs_dtos, handlers as audit_logs_handlers};
use crate::features::auth;
use crate::features::desa::{dtos as desa_dtos, handlers as desa_handlers};
use crate::features::events::{
    dtos as events_dtos, handlers as events_handlers, models as events_models,
};
use crate::features::generus::{
    dtos as generus_dtos, handlers as generus_handlers, models as generus_models,
};
use crate::features::kelompok::{dtos as kelompok_dtos, handlers as kelompok_handlers};
use crate::features::presences::{
    dtos as presences_dtos, eligibility, geolocation, handlers as presences_handlers,
    models as presences_models,
};
use crate::shared::geo::Coordinates;
use crate::shared::types::{ApiResponse, Meta};

/// `#[openapi(components(schemas(...)))]` only accepts path types, so the unit
/// instantiation is registered through this alias.
type EmptyApiResponse = ApiResponse<()>;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Check-in (public)
        presences_handlers::get_public_event,
        presences_handlers::get_roster,
        presences_handlers::get_counts,
        presences_handlers::check_eligibility,
        presences_handlers::create_presence,
        // Desa
        desa_handlers::list_desa,
        desa_handlers::get_desa,
        desa_handlers::create_desa,
        desa_handlers::update_desa,
        desa_handlers::delete_desa,
        // Kelompok
        kelompok_handlers::list_kelompok,
        kelompok_handlers::get_kelompok,
        kelompok_handlers::create_kelompok,
        kelompok_handlers::update_kelompok,
        kelompok_handlers::delete_kelompok,
        // Generus
        generus_handlers::list_generus,
        generus_handlers::get_generus,
        generus_handlers::create_generus,
        generus_handlers::update_generus,
        generus_handlers::delete_generus,
        // Events
        events_handlers::list_events,
        events_handlers::get_event,
        events_handlers::create_event,
        events_handlers::update_event,
        events_handlers::delete_event,
        // Presences (admin)
        presences_handlers::list_event_presences,
        presences_handlers::delete_presence,
        // Audit logs
        audit_logs_handlers::list_audit_logs,
    ),
    components(
        schemas(
            EmptyApiResponse,
            Meta,
            Coordinates,
            // Auth
            auth::dto::MeResponseDto,
            // Desa / Kelompok / Generus
            desa_dtos::UpsertDesaDto,
            desa_dtos::DesaResponseDto,
            kelompok_dtos::UpsertKelompokDto,
            kelompok_dtos::KelompokResponseDto,
            generus_models::Gender,
            generus_dtos::UpsertGenerusDto,
            generus_dtos::GenerusResponseDto,
            // Events
            events_models::EventStatus,
            events_dtos::UpsertEventDto,
            events_dtos::EventResponseDto,
            events_dtos::PublicEventDto,
            // Check-in
            geolocation::GeolocationReport,
            eligibility::EligibilityReason,
            eligibility::EligibilityDecision,
            presences_models::PresenceStatus,
            presences_models::PresenceCounts,
            presences_models::PresencePercentage,
            presences_dtos::CreatePresenceDto,
            presences_dtos::PresenceResponseDto,
            presences_dtos::RecordedPresenceDto,
            presences_dtos::RosterEntryDto,
            presences_dtos::PresenceRecordDto,
            // Audit logs
            audit_logs_dtos::AuditLogResponseDto,
        )
    ),
    tags(
        (name = "auth", description = "Current back-office user"),
        (name = "check-in", description = "Public geofenced attendance check-in"),
        (name = "desa", description = "Desa management"),
        (name = "kelompok", description = "Kelompok management"),
        (name = "generus", description = "Generus management"),
        (name = "events", description = "Event management"),
        (name = "presences", description = "Presence administration"),
        (name = "audit-logs", description = "Audit trail (super admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Generus Presensi API",
        version = "0.1.0",
        description = "API documentation for Generus Presensi",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_check_in_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/public/events/{id}",
            "/api/public/events/{id}/roster",
            "/api/public/events/{id}/counts",
            "/api/public/events/{id}/eligibility",
            "/api/public/presences",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Presensi".to_string(),
            version: "9.9.9".to_string(),
            description: "Staging".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Presensi");
        assert_eq!(doc.info.description.as_deref(), Some("Staging"));
    }
}
