use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::audit_logs::handlers;
use crate::features::audit_logs::services::AuditLogService;

/// Create audit log routes (nested under /api/admin, super admin only)
pub fn routes(service: Arc<AuditLogService>) -> Router {
    Router::new()
        .route("/audit-logs", get(handlers::list_audit_logs))
        .with_state(service)
}
