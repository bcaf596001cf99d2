use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for forum answer
#[derive(Debug, Clone, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub body: String,
    pub author_id: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
