use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::presences::handlers;
use crate::features::presences::services::PresenceService;

/// Check-in routes (no authentication)
pub fn public_routes(service: Arc<PresenceService>) -> Router {
    Router::new()
        .route("/api/public/events/{id}", get(handlers::get_public_event))
        .route("/api/public/events/{id}/roster", get(handlers::get_roster))
        .route("/api/public/events/{id}/counts", get(handlers::get_counts))
        .route(
            "/api/public/events/{id}/eligibility",
            post(handlers::check_eligibility),
        )
        .route("/api/public/presences", post(handlers::create_presence))
        .with_state(service)
}

/// Presence administration (nested under /api/admin)
pub fn admin_routes(service: Arc<PresenceService>) -> Router {
    Router::new()
        .route(
            "/events/{id}/presences",
            get(handlers::list_event_presences),
        )
        .route("/presences/{id}", delete(handlers::delete_presence))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::core::config::CheckinConfig;
    use crate::shared::test_helpers::{
        active_event_at, with_admin_auth, InMemoryPresenceRepository, MemoryAuditRecorder,
    };

    struct TestApp {
        server: TestServer,
        event_id: Uuid,
        generus_id: Uuid,
    }

    async fn test_app() -> TestApp {
        let repository = Arc::new(InMemoryPresenceRepository::default());
        let event = active_event_at(-7.0, 110.0);
        let event_id = event.id;
        repository.add_event(event).await;
        let generus_id = repository.add_generus("Kelompok Timur").await;

        let service = Arc::new(PresenceService::new(
            repository,
            Arc::new(MemoryAuditRecorder::default()),
            CheckinConfig::default(),
        ));
        let app = Router::new()
            .merge(public_routes(Arc::clone(&service)))
            .nest("/api/admin", with_admin_auth(admin_routes(service)));

        TestApp {
            server: TestServer::new(app).unwrap(),
            event_id,
            generus_id,
        }
    }

    fn location(latitude: f64, longitude: f64) -> Value {
        json!({
            "coordinates": { "latitude": latitude, "longitude": longitude },
            "isAvailable": true,
            "isEnabled": true
        })
    }

    #[tokio::test]
    async fn test_public_event_has_status() {
        let app = test_app().await;

        let response = app
            .server
            .get(&format!("/api/public/events/{}", app.event_id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["latitude"], -7.0);

        app.server
            .get(&format!("/api/public/events/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_in_within_radius() {
        let app = test_app().await;

        let eligibility: Value = app
            .server
            .post(&format!("/api/public/events/{}/eligibility", app.event_id))
            .json(&location(-7.005, 110.0))
            .await
            .json();
        assert_eq!(eligibility["data"]["allowed"], true);

        let response = app
            .server
            .post("/api/public/presences")
            .json(&json!({
                "eventId": app.event_id,
                "generusId": app.generus_id,
                "status": "Izin",
                "location": location(-7.005, 110.0)
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["presence"]["status"], "Izin");
        assert_eq!(
            body["data"]["invalidates"],
            json!([
                format!("roster:{}", app.event_id),
                format!("counts:{}", app.event_id)
            ])
        );

        let roster: Value = app
            .server
            .get(&format!("/api/public/events/{}/roster", app.event_id))
            .await
            .json();
        assert_eq!(roster["data"][0]["generusId"], json!(app.generus_id));
        assert_eq!(roster["data"][0]["isDisabled"], true);

        let counts: Value = app
            .server
            .get(&format!("/api/public/events/{}/counts", app.event_id))
            .await
            .json();
        assert_eq!(counts["data"]["izin"], 1);
        assert_eq!(counts["data"]["total"], 1);
    }

    #[tokio::test]
    async fn test_check_in_out_of_radius_blocked() {
        let app = test_app().await;

        let eligibility: Value = app
            .server
            .post(&format!("/api/public/events/{}/eligibility", app.event_id))
            .json(&location(-7.020, 110.0))
            .await
            .json();
        assert_eq!(eligibility["data"]["allowed"], false);
        assert_eq!(eligibility["data"]["reason"], "out_of_radius");
        assert_eq!(eligibility["data"]["canRetryLocation"], true);

        app.server
            .post("/api/public/presences")
            .json(&json!({
                "eventId": app.event_id,
                "generusId": app.generus_id,
                "status": "Hadir",
                "location": location(-7.020, 110.0)
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let counts: Value = app
            .server
            .get(&format!("/api/public/events/{}/counts", app.event_id))
            .await
            .json();
        assert_eq!(counts["data"]["total"], 0);
    }

    #[tokio::test]
    async fn test_duplicate_check_in_conflicts() {
        let app = test_app().await;
        let submission = json!({
            "eventId": app.event_id,
            "generusId": app.generus_id,
            "status": "Hadir",
            "location": location(-7.0, 110.0)
        });

        app.server
            .post("/api/public/presences")
            .json(&submission)
            .await
            .assert_status(StatusCode::CREATED);
        let response = app
            .server
            .post("/api/public/presences")
            .json(&submission)
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_submissions() {
        let app = test_app().await;

        app.server
            .post("/api/public/presences")
            .json(&json!({ "eventId": app.event_id, "status": "Hadir" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .post("/api/public/presences")
            .json(&json!({
                "eventId": app.event_id,
                "generusId": app.generus_id,
                "status": "Terlambat"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrapped_coordinates_rejected() {
        let app = test_app().await;

        // Same point as the event once wrapped, so only a range check stops it
        let response = app
            .server
            .post("/api/public/presences")
            .json(&json!({
                "eventId": app.event_id,
                "generusId": app.generus_id,
                "status": "Hadir",
                "location": location(353.0, 470.0)
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);

        let counts: Value = app
            .server
            .get(&format!("/api/public/events/{}/counts", app.event_id))
            .await
            .json();
        assert_eq!(counts["data"]["total"], 0);

        app.server
            .post(&format!("/api/public/events/{}/eligibility", app.event_id))
            .json(&location(353.0, 470.0))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .post(&format!("/api/public/events/{}/eligibility", app.event_id))
            .json(&location(-7.0, 190.0))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_lists_and_deletes_presence() {
        let app = test_app().await;
        let created: Value = app
            .server
            .post("/api/public/presences")
            .json(&json!({
                "eventId": app.event_id,
                "generusId": app.generus_id,
                "status": "Tidak Hadir",
                "location": location(-7.0, 110.0)
            }))
            .await
            .json();
        let presence_id = created["data"]["presence"]["id"].as_str().unwrap().to_string();

        let listed: Value = app
            .server
            .get(&format!("/api/admin/events/{}/presences", app.event_id))
            .await
            .json();
        assert_eq!(listed["meta"]["total"], 1);
        assert_eq!(listed["data"][0]["status"], "Tidak Hadir");

        app.server
            .delete(&format!("/api/admin/presences/{}", presence_id))
            .await
            .assert_status_ok();
        app.server
            .delete(&format!("/api/admin/presences/{}", presence_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_require_user() {
        let repository = Arc::new(InMemoryPresenceRepository::default());
        let service = Arc::new(PresenceService::new(
            repository,
            Arc::new(MemoryAuditRecorder::default()),
            CheckinConfig::default(),
        ));
        let server =
            TestServer::new(Router::new().nest("/api/admin", admin_routes(service))).unwrap();

        server
            .delete(&format!("/api/admin/presences/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
