use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Article lifecycle status. Transitions are unconstrained (any to any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "article_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

/// Database model for article
#[derive(Debug, Clone, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Structured rich-text document produced by the editor component
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub status: ArticleStatus,
    pub author_id: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
