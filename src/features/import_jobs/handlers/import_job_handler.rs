use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::import_jobs::dtos::ImportJobResponseDto;
use crate::features::import_jobs::services::ImportJobService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List import jobs, newest first
#[utoipa::path(
    get,
    path = "/api/import/jobs",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of import jobs", body = ApiResponse<Vec<ImportJobResponseDto>>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "import-jobs"
)]
pub async fn list_import_jobs(
    State(service): State<Arc<ImportJobService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ImportJobResponseDto>>>> {
    let (jobs, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(jobs),
        None,
        Some(Meta { total }),
    )))
}

/// Get import job by id
#[utoipa::path(
    get,
    path = "/api/import/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Import job id")
    ),
    responses(
        (status = 200, description = "Import job found", body = ApiResponse<ImportJobResponseDto>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Import job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "import-jobs"
)]
pub async fn get_import_job(
    State(service): State<Arc<ImportJobService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ImportJobResponseDto>>> {
    let job = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(job), None, None)))
}
