use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::rate_limits::limiter::identity_for;
use crate::features::rate_limits::{EndpointClass, FixedWindowLimiter, RateLimitDecision};
use crate::features::search::dtos::{SearchQuery, SearchResponseDto};
use crate::features::search::services::SearchService;
use crate::shared::constants::MIN_SEARCH_QUERY_LENGTH;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct SearchState {
    pub service: Arc<SearchService>,
    pub limiter: Arc<FixedWindowLimiter>,
}

/// Request-origin identifier for unauthenticated callers. The service runs
/// behind a proxy, so the first X-Forwarded-For hop is the origin.
fn client_origin(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Full-text search over articles and forum questions
///
/// Rate limited per identity (authenticated user id, or request origin for
/// anonymous callers).
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = ApiResponse<SearchResponseDto>),
        (status = 400, description = "Query too short"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<SearchState>,
    user: Option<Extension<AuthenticatedUser>>,
    headers: HeaderMap,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponseDto>>> {
    let query = params.q.trim();
    if query.chars().count() < MIN_SEARCH_QUERY_LENGTH {
        return Err(AppError::Validation(format!(
            "Search query must be at least {} characters",
            MIN_SEARCH_QUERY_LENGTH
        )));
    }

    let origin = client_origin(&headers);
    let identity = identity_for(user.as_ref().map(|u| u.0.id.as_str()), &origin);

    match state.limiter.check(&identity, EndpointClass::Search) {
        RateLimitDecision::Rejected { retry_after } => {
            tracing::warn!("Search rate limit hit for {}", identity);
            Err(AppError::RateLimitExceeded {
                retry_after_secs: retry_after.as_secs().max(1),
            })
        }
        RateLimitDecision::Allowed { .. } => {
            let response = state.service.search(query).await?;
            Ok(Json(ApiResponse::success(Some(response), None, None)))
        }
    }
}
