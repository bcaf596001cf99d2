use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::forum::models::{Answer, Question};

/// Request DTO for asking a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionDto {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

/// Request DTO for answering a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerDto {
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

/// Listing entry for a question
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponseDto {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub answer_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponseDto {
    pub id: Uuid,
    pub question_id: Uuid,
    pub body: String,
    pub author_id: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Answer> for AnswerResponseDto {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            question_id: a.question_id,
            body: a.body,
            author_id: a.author_id,
            is_accepted: a.is_accepted,
            created_at: a.created_at,
        }
    }
}

/// Question with its answers (accepted first, then newest)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDetailDto {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub answers: Vec<AnswerResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionDetailDto {
    pub fn from_parts(question: Question, answers: Vec<Answer>) -> Self {
        Self {
            id: question.id,
            title: question.title,
            body: question.body,
            author_id: question.author_id,
            answers: answers.into_iter().map(|a| a.into()).collect(),
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}
