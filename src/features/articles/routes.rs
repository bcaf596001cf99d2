use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::articles::handlers;
use crate::features::articles::services::ArticleService;

/// Read-only article routes (no authentication required)
pub fn public_routes(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/{id}", get(handlers::get_article))
        .with_state(service)
}

/// Mutating article routes (authenticated users, mounted behind the auth
/// middleware; per-article ownership is checked in the service)
pub fn protected_routes(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route("/api/articles", post(handlers::create_article))
        .route(
            "/api/articles/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        .with_state(service)
}
