use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::generus::handlers;
use crate::features::generus::services::GenerusService;

/// Create generus routes (nested under /api/admin)
pub fn routes(service: Arc<GenerusService>) -> Router {
    Router::new()
        .route(
            "/generus",
            get(handlers::list_generus).post(handlers::create_generus),
        )
        .route(
            "/generus/{id}",
            get(handlers::get_generus)
                .put(handlers::update_generus)
                .delete(handlers::delete_generus),
        )
        .with_state(service)
}
