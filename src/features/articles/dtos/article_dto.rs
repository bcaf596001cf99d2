use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::articles::models::{Article, ArticleStatus};
use crate::features::categories::dtos::BreadcrumbDto;

/// Request DTO for creating an article
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateArticleDto {
    pub title: String,
    /// URL-safe identifier, must match `^[a-z0-9-]+$`
    pub slug: String,
    /// Structured rich-text document
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    #[serde(default = "default_status")]
    pub status: ArticleStatus,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

fn default_status() -> ArticleStatus {
    ArticleStatus::Draft
}

/// Request DTO for updating an article
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateArticleDto {
    pub title: String,
    pub slug: String,
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub status: ArticleStatus,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Optional filters for the article listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ArticleFilterQuery {
    /// Restrict to articles filed under this category
    pub category_id: Option<Uuid>,
    /// Free-text query, delegated to the database search function
    pub q: Option<String>,
}

/// Normalized filter set. An omitted or blank parameter means "no
/// constraint", never "constrain to empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub category_id: Option<Uuid>,
    pub query: Option<String>,
}

impl ArticleFilter {
    pub fn from_params(params: ArticleFilterQuery) -> Self {
        let query = params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        Self {
            category_id: params.category_id,
            query,
        }
    }
}

/// Listing entry (content omitted)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub status: ArticleStatus,
    pub author_id: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponseDto {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            slug: a.slug,
            excerpt: a.excerpt,
            status: a.status,
            author_id: a.author_id,
            view_count: a.view_count,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Full article with categories and breadcrumb trail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleDetailDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub status: ArticleStatus,
    pub author_id: String,
    pub view_count: i64,
    pub category_ids: Vec<Uuid>,
    pub breadcrumbs: Vec<BreadcrumbDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_no_constraint() {
        let filter = ArticleFilter::from_params(ArticleFilterQuery {
            category_id: None,
            q: Some("   ".to_string()),
        });
        assert_eq!(filter, ArticleFilter::default());
    }

    #[test]
    fn cleared_filters_equal_absent_filters() {
        let cleared = ArticleFilter::from_params(ArticleFilterQuery {
            category_id: None,
            q: Some(String::new()),
        });
        let absent = ArticleFilter::from_params(ArticleFilterQuery::default());
        assert_eq!(cleared, absent);
    }

    #[test]
    fn query_is_trimmed() {
        let filter = ArticleFilter::from_params(ArticleFilterQuery {
            category_id: None,
            q: Some("  vpn setup  ".to_string()),
        });
        assert_eq!(filter.query.as_deref(), Some("vpn setup"));
    }
}
