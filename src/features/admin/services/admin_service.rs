use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::CleanupResponseDto;

/// Destructive maintenance operations, admin only
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn truncate(&self, table: &str) -> Result<u64> {
        // Table names come from the fixed list in cleanup(), never from input.
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Cleanup failed on {}: {:?}", table, e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected())
    }

    /// Delete all content rows, children before parents.
    ///
    /// Each table is cleared in its own statement; a failure part-way leaves
    /// the earlier deletions in place.
    pub async fn cleanup(&self) -> Result<CleanupResponseDto> {
        let answers_deleted = self.truncate("answers").await?;
        let questions_deleted = self.truncate("questions").await?;
        let article_categories_deleted = self.truncate("article_categories").await?;
        let articles_deleted = self.truncate("articles").await?;
        let categories_deleted = self.truncate("categories").await?;

        tracing::warn!(
            "Cleanup removed {} answers, {} questions, {} article links, {} articles, {} categories",
            answers_deleted,
            questions_deleted,
            article_categories_deleted,
            articles_deleted,
            categories_deleted
        );

        Ok(CleanupResponseDto {
            answers_deleted,
            questions_deleted,
            article_categories_deleted,
            articles_deleted,
            categories_deleted,
        })
    }
}
