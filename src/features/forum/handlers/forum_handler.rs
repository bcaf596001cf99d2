use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::forum::dtos::{
    AnswerResponseDto, CreateAnswerDto, CreateQuestionDto, QuestionDetailDto, QuestionResponseDto,
};
use crate::features::forum::services::ForumService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List questions, newest first
#[utoipa::path(
    get,
    path = "/api/forum/questions",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of questions", body = ApiResponse<Vec<QuestionResponseDto>>),
    ),
    tag = "forum"
)]
pub async fn list_questions(
    State(service): State<Arc<ForumService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<QuestionResponseDto>>>> {
    let (questions, total) = service.list_questions(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(questions),
        None,
        Some(Meta { total }),
    )))
}

/// Get a question with its answers
#[utoipa::path(
    get,
    path = "/api/forum/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question found", body = ApiResponse<QuestionDetailDto>),
        (status = 404, description = "Question not found")
    ),
    tag = "forum"
)]
pub async fn get_question(
    State(service): State<Arc<ForumService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuestionDetailDto>>> {
    let question = service.get_question(id).await?;
    Ok(Json(ApiResponse::success(Some(question), None, None)))
}

/// Ask a question
#[utoipa::path(
    post,
    path = "/api/forum/questions",
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = ApiResponse<QuestionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "forum"
)]
pub async fn create_question(
    user: AuthenticatedUser,
    State(service): State<Arc<ForumService>>,
    AppJson(dto): AppJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let question = service.create_question(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(question), None, None)),
    ))
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/api/forum/questions/{id}/answers",
    params(
        ("id" = Uuid, Path, description = "Question id")
    ),
    request_body = CreateAnswerDto,
    responses(
        (status = 201, description = "Answer created", body = ApiResponse<AnswerResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer_auth" = [])),
    tag = "forum"
)]
pub async fn create_answer(
    user: AuthenticatedUser,
    State(service): State<Arc<ForumService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateAnswerDto>,
) -> Result<(StatusCode, Json<ApiResponse<AnswerResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let answer = service.create_answer(&user, id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(answer), None, None)),
    ))
}

/// Accept an answer (question author or admin only)
#[utoipa::path(
    post,
    path = "/api/forum/answers/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Answer id")
    ),
    responses(
        (status = 200, description = "Answer accepted", body = ApiResponse<AnswerResponseDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the question author or an admin"),
        (status = 404, description = "Answer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "forum"
)]
pub async fn accept_answer(
    user: AuthenticatedUser,
    State(service): State<Arc<ForumService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnswerResponseDto>>> {
    let answer = service.accept_answer(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(answer),
        Some("Answer accepted".to_string()),
        None,
    )))
}
