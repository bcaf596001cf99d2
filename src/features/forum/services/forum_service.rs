use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::forum::dtos::{
    AnswerResponseDto, CreateAnswerDto, CreateQuestionDto, QuestionDetailDto, QuestionResponseDto,
};
use crate::features::forum::models::{Answer, Question};
use crate::shared::constants::MAX_NAME_LENGTH;
use crate::shared::types::{FieldError, PaginationQuery};

const QUESTION_COLUMNS: &str = "id, title, body, author_id, created_at, updated_at";
const ANSWER_COLUMNS: &str =
    "id, question_id, body, author_id, is_accepted, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct QuestionListRow {
    #[sqlx(flatten)]
    question: Question,
    answer_count: i64,
}

fn validate_question_fields(title: &str, body: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() as u64 > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title must not exceed {} characters", MAX_NAME_LENGTH),
        ));
    }

    if body.trim().is_empty() {
        errors.push(FieldError::new("body", "Body is required"));
    }

    errors
}

/// Service for the Q&A forum
pub struct ForumService {
    pool: PgPool,
}

impl ForumService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List questions, newest first, with answer counts
    pub async fn list_questions(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<QuestionResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count questions: {:?}", e);
                AppError::Database(e)
            })?;

        let rows = sqlx::query_as::<_, QuestionListRow>(
            "SELECT q.id, q.title, q.body, q.author_id, q.created_at, q.updated_at, \
                    (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answer_count \
             FROM questions q \
             ORDER BY q.created_at DESC \
             OFFSET $1 LIMIT $2",
        )
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list questions: {:?}", e);
            AppError::Database(e)
        })?;

        let items = rows
            .into_iter()
            .map(|row| {
                let q = row.question;
                QuestionResponseDto {
                    id: q.id,
                    title: q.title,
                    body: q.body,
                    author_id: q.author_id,
                    answer_count: row.answer_count,
                    created_at: q.created_at,
                    updated_at: q.updated_at,
                }
            })
            .collect();

        Ok((items, total))
    }

    async fn fetch_question(&self, id: Uuid) -> Result<Question> {
        let query = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get question: {:?}", e);
                AppError::Database(e)
            })?;

        question.ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", id)))
    }

    /// Get a question with its answers (accepted first, then newest)
    pub async fn get_question(&self, id: Uuid) -> Result<QuestionDetailDto> {
        let question = self.fetch_question(id).await?;

        let query = format!(
            "SELECT {} FROM answers WHERE question_id = $1 \
             ORDER BY is_accepted DESC, created_at DESC",
            ANSWER_COLUMNS
        );
        let answers = sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list answers: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(QuestionDetailDto::from_parts(question, answers))
    }

    /// Ask a question
    pub async fn create_question(
        &self,
        user: &AuthenticatedUser,
        dto: CreateQuestionDto,
    ) -> Result<QuestionResponseDto> {
        let errors = validate_question_fields(&dto.title, &dto.body);
        if !errors.is_empty() {
            return Err(AppError::ValidationFields(errors));
        }

        let query = format!(
            "INSERT INTO questions (title, body, author_id) VALUES ($1, $2, $3) RETURNING {}",
            QUESTION_COLUMNS
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(&dto.title)
            .bind(&dto.body)
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create question: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Question created: id={}", question.id);

        Ok(QuestionResponseDto {
            id: question.id,
            title: question.title,
            body: question.body,
            author_id: question.author_id,
            answer_count: 0,
            created_at: question.created_at,
            updated_at: question.updated_at,
        })
    }

    /// Answer a question
    pub async fn create_answer(
        &self,
        user: &AuthenticatedUser,
        question_id: Uuid,
        dto: CreateAnswerDto,
    ) -> Result<AnswerResponseDto> {
        if dto.body.trim().is_empty() {
            return Err(AppError::ValidationFields(vec![FieldError::new(
                "body",
                "Body is required",
            )]));
        }

        // 404 before insert when the question is gone
        self.fetch_question(question_id).await?;

        let query = format!(
            "INSERT INTO answers (question_id, body, author_id) \
             VALUES ($1, $2, $3) RETURNING {}",
            ANSWER_COLUMNS
        );
        let answer = sqlx::query_as::<_, Answer>(&query)
            .bind(question_id)
            .bind(&dto.body)
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create answer: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(answer.into())
    }

    /// Mark an answer as accepted (question author or admin only).
    ///
    /// Any previously accepted answer is cleared first; the two updates are
    /// separate statements and are not atomic.
    pub async fn accept_answer(
        &self,
        user: &AuthenticatedUser,
        answer_id: Uuid,
    ) -> Result<AnswerResponseDto> {
        let query = format!("SELECT {} FROM answers WHERE id = $1", ANSWER_COLUMNS);
        let answer = sqlx::query_as::<_, Answer>(&query)
            .bind(answer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get answer: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Answer '{}' not found", answer_id)))?;

        let question = self.fetch_question(answer.question_id).await?;
        if !user.can_edit(&question.author_id) {
            return Err(AppError::Forbidden(
                "Only the question author or an admin may accept an answer".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE answers SET is_accepted = FALSE, updated_at = NOW() \
             WHERE question_id = $1 AND is_accepted",
        )
        .bind(answer.question_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to clear accepted answer: {:?}", e);
            AppError::Database(e)
        })?;

        let query = format!(
            "UPDATE answers SET is_accepted = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            ANSWER_COLUMNS
        );
        let accepted = sqlx::query_as::<_, Answer>(&query)
            .bind(answer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to accept answer: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Answer accepted: question_id={}, answer_id={}",
            answer.question_id,
            answer_id
        );

        Ok(accepted.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_requires_title_and_body() {
        let errors = validate_question_fields("", " ");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "body"]);
    }

    #[test]
    fn question_title_has_a_length_bound() {
        let title = "q".repeat(MAX_NAME_LENGTH as usize + 1);
        let errors = validate_question_fields(&title, "How do I reset my token?");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }
}
