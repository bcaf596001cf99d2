use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListingDto, CategoryResponseDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// Query params for listing categories
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// List all categories
///
/// Returns categories as flat list or depth-annotated tree based on the
/// `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("tree" = Option<bool>, Query, description = "Return tree structure if true")
    ),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<CategoryListingDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListingDto>>> {
    let listing = if query.tree {
        CategoryListingDto::Tree(service.list_tree().await?)
    } else {
        CategoryListingDto::Flat(service.list().await?)
    };
    Ok(Json(ApiResponse::success(Some(listing), None, None)))
}

/// Get category by id, including its breadcrumb path
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Slug already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn create_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Update a category (admin only)
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn update_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category (admin only)
///
/// Children of the deleted category are re-parented to its parent.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn delete_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}
