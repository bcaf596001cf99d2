use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for forum question
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
