use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::events::handlers;
use crate::features::events::services::EventService;

/// Create event routes (nested under /api/admin)
pub fn routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .with_state(service)
}
