use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::articles::dtos::{
    ArticleDetailDto, ArticleFilter, ArticleFilterQuery, ArticleResponseDto, CreateArticleDto,
    UpdateArticleDto,
};
use crate::features::articles::services::ArticleService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List articles
///
/// Optional filters: `category_id` restricts through the association table,
/// `q` delegates to the database search function. Clearing every filter
/// returns the unfiltered listing.
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ArticleFilterQuery, PaginationQuery),
    responses(
        (status = 200, description = "List of articles", body = ApiResponse<Vec<ArticleResponseDto>>),
    ),
    tag = "articles"
)]
pub async fn list_articles(
    State(service): State<Arc<ArticleService>>,
    Query(filter): Query<ArticleFilterQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleResponseDto>>>> {
    let filter = ArticleFilter::from_params(filter);
    let (articles, total) = service.list(filter, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(articles),
        None,
        Some(Meta { total }),
    )))
}

/// Get article by id
///
/// Bumps the view counter best-effort; the response never waits for it.
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article id")
    ),
    responses(
        (status = 200, description = "Article found", body = ApiResponse<ArticleDetailDto>),
        (status = 404, description = "Article not found")
    ),
    tag = "articles"
)]
pub async fn get_article(
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ArticleDetailDto>>> {
    let article = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}

/// Create an article owned by the caller
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = CreateArticleDto,
    responses(
        (status = 201, description = "Article created", body = ApiResponse<ArticleResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Slug already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn create_article(
    user: AuthenticatedUser,
    State(service): State<Arc<ArticleService>>,
    AppJson(dto): AppJson<CreateArticleDto>,
) -> Result<(StatusCode, Json<ApiResponse<ArticleResponseDto>>)> {
    let article = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(article), None, None)),
    ))
}

/// Update an article (author or admin only)
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article id")
    ),
    request_body = UpdateArticleDto,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<ArticleResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Article not found"),
        (status = 409, description = "Slug already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn update_article(
    user: AuthenticatedUser,
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateArticleDto>,
) -> Result<Json<ApiResponse<ArticleResponseDto>>> {
    let article = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(article), None, None)))
}

/// Delete an article (author or admin only)
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(
        ("id" = Uuid, Path, description = "Article id")
    ),
    responses(
        (status = 200, description = "Article deleted"),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = [])),
    tag = "articles"
)]
pub async fn delete_article(
    user: AuthenticatedUser,
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Article deleted".to_string()),
        None,
    )))
}
