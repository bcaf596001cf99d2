use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query params for the search endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query, minimum 2 characters after trimming
    pub q: String,
}

/// One search hit; ranking comes from the database search function
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResultDto {
    /// "article" or "question"
    #[serde(rename = "type")]
    pub result_type: String,
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub rank: f32,
    pub created_at: DateTime<Utc>,
    /// Frontend path for this hit
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponseDto {
    pub results: Vec<SearchResultDto>,
    pub count: usize,
    pub query: String,
}
