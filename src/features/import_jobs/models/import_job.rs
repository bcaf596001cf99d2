use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a bulk import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "import_job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImportJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Database model for import job
#[derive(Debug, Clone, FromRow)]
pub struct ImportJob {
    pub id: Uuid,
    pub status: ImportJobStatus,
    pub file_name: String,
    pub stats: Option<serde_json::Value>,
    pub errors: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
