use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Admin-only maintenance routes (mounted behind the auth middleware; the
/// admin role is enforced by the handler guard)
pub fn protected_routes(service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/api/admin/cleanup", post(handlers::cleanup))
        .with_state(service)
}
