use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::desa::handlers;
use crate::features::desa::services::DesaService;

/// Create desa routes (nested under /api/admin)
pub fn routes(service: Arc<DesaService>) -> Router {
    Router::new()
        .route(
            "/desa",
            get(handlers::list_desa).post(handlers::create_desa),
        )
        .route(
            "/desa/{id}",
            get(handlers::get_desa)
                .put(handlers::update_desa)
                .delete(handlers::delete_desa),
        )
        .with_state(service)
}
