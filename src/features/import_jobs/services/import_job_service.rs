use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::import_jobs::dtos::ImportJobResponseDto;
use crate::features::import_jobs::models::ImportJob;
use crate::shared::types::PaginationQuery;

const JOB_COLUMNS: &str =
    "id, status, file_name, stats, errors, created_by, created_at, completed_at";

/// Read side of the bulk import pipeline; jobs are produced elsewhere and
/// this service only reports on them.
pub struct ImportJobService {
    pool: PgPool,
}

impl ImportJobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List import jobs, newest first
    pub async fn list(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ImportJobResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM import_jobs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count import jobs: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM import_jobs ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, ImportJob>(&query)
            .bind(pagination.offset())
            .bind(pagination.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list import jobs: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((jobs.into_iter().map(|j| j.into()).collect(), total))
    }

    /// Get a single import job by id
    pub async fn get(&self, id: Uuid) -> Result<ImportJobResponseDto> {
        let query = format!("SELECT {} FROM import_jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, ImportJob>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get import job: {:?}", e);
                AppError::Database(e)
            })?;

        job.map(|j| j.into())
            .ok_or_else(|| AppError::NotFound(format!("Import job '{}' not found", id)))
    }
}
