use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-table row counts removed by a cleanup run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponseDto {
    pub answers_deleted: u64,
    pub questions_deleted: u64,
    pub article_categories_deleted: u64,
    pub articles_deleted: u64,
    pub categories_deleted: u64,
}
