use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Read-only category routes (no authentication required)
pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{id}", get(handlers::get_category))
        .with_state(service)
}

/// Mutating category routes (admin only, mounted behind the auth middleware)
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", post(handlers::create_category))
        .route(
            "/api/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}
