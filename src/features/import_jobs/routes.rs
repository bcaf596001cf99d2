use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::import_jobs::handlers;
use crate::features::import_jobs::services::ImportJobService;

/// Import job routes (authenticated users, mounted behind the auth middleware)
pub fn protected_routes(service: Arc<ImportJobService>) -> Router {
    Router::new()
        .route("/api/import/jobs", get(handlers::list_import_jobs))
        .route("/api/import/jobs/{id}", get(handlers::get_import_job))
        .with_state(service)
}
