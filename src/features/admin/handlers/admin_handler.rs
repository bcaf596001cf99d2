use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::admin::dtos::CleanupResponseDto;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Delete all knowledge base content (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/cleanup",
    responses(
        (status = 200, description = "Content deleted", body = ApiResponse<CleanupResponseDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn cleanup(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<CleanupResponseDto>>> {
    tracing::warn!("Cleanup requested by {}", user.id);
    let counts = service.cleanup().await?;
    Ok(Json(ApiResponse::success(
        Some(counts),
        Some("All content deleted".to_string()),
        None,
    )))
}
