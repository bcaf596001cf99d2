use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::import_jobs::models::{ImportJob, ImportJobStatus};

/// Response DTO for an import job
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportJobResponseDto {
    pub id: Uuid,
    pub status: ImportJobStatus,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<serde_json::Value>,
    pub errors: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ImportJob> for ImportJobResponseDto {
    fn from(job: ImportJob) -> Self {
        Self {
            id: job.id,
            status: job.status,
            file_name: job.file_name,
            stats: job.stats,
            errors: job.errors,
            created_by: job.created_by,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}
