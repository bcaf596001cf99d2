use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::search::dtos::{SearchResponseDto, SearchResultDto};

#[derive(Debug, FromRow)]
struct SearchRow {
    result_type: String,
    id: Uuid,
    title: String,
    excerpt: String,
    rank: f32,
    created_at: DateTime<Utc>,
}

/// Service for full-text search. Matching and ranking live in the
/// database's `search_content` function; this layer only shapes the query
/// and the results.
pub struct SearchService {
    pool: PgPool,
}

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a search for an already validated, trimmed query string
    pub async fn search(&self, query: &str) -> Result<SearchResponseDto> {
        let rows = sqlx::query_as::<_, SearchRow>(
            "SELECT result_type, id, title, excerpt, rank, created_at FROM search_content($1)",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Search query failed: {:?}", e);
            AppError::Database(e)
        })?;

        let results: Vec<SearchResultDto> = rows
            .into_iter()
            .map(|row| {
                let url = match row.result_type.as_str() {
                    "question" => format!("/forum/{}", row.id),
                    _ => format!("/articles/{}", row.id),
                };
                SearchResultDto {
                    result_type: row.result_type,
                    id: row.id,
                    title: row.title,
                    excerpt: row.excerpt,
                    rank: row.rank,
                    created_at: row.created_at,
                    url,
                }
            })
            .collect();

        Ok(SearchResponseDto {
            count: results.len(),
            query: query.to_string(),
            results,
        })
    }
}
