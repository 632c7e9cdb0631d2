use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::kelompok::handlers;
use crate::features::kelompok::services::KelompokService;

/// Create kelompok routes (nested under /api/admin)
pub fn routes(service: Arc<KelompokService>) -> Router {
    Router::new()
        .route(
            "/kelompok",
            get(handlers::list_kelompok).post(handlers::create_kelompok),
        )
        .route(
            "/kelompok/{id}",
            get(handlers::get_kelompok)
                .put(handlers::update_kelompok)
                .delete(handlers::delete_kelompok),
        )
        .with_state(service)
}
