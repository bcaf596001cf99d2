use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::articles::{
    dtos as articles_dtos, handlers as articles_handlers, models as articles_models,
};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::forum::{dtos as forum_dtos, handlers as forum_handlers};
use crate::features::import_jobs::{
    dtos as import_jobs_dtos, handlers as import_jobs_handlers, models as import_jobs_models,
};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers};
use crate::shared::types::{ApiResponse, FieldError, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public reads, admin writes)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Articles
        articles_handlers::list_articles,
        articles_handlers::get_article,
        articles_handlers::create_article,
        articles_handlers::update_article,
        articles_handlers::delete_article,
        // Forum
        forum_handlers::list_questions,
        forum_handlers::get_question,
        forum_handlers::create_question,
        forum_handlers::create_answer,
        forum_handlers::accept_answer,
        // Search (public, rate limited)
        search_handlers::search,
        // Import jobs (protected)
        import_jobs_handlers::list_import_jobs,
        import_jobs_handlers::get_import_job,
        // Admin
        admin_handlers::cleanup,
    ),
    components(
        schemas(
            // Shared
            Meta,
            FieldError,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryListingDto,
            categories_dtos::BreadcrumbDto,
            categories_dtos::CategoryDetailDto,
            ApiResponse<categories_dtos::CategoryListingDto>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            // Articles
            articles_models::ArticleStatus,
            articles_dtos::CreateArticleDto,
            articles_dtos::UpdateArticleDto,
            articles_dtos::ArticleResponseDto,
            articles_dtos::ArticleDetailDto,
            ApiResponse<Vec<articles_dtos::ArticleResponseDto>>,
            ApiResponse<articles_dtos::ArticleResponseDto>,
            ApiResponse<articles_dtos::ArticleDetailDto>,
            // Forum
            forum_dtos::CreateQuestionDto,
            forum_dtos::CreateAnswerDto,
            forum_dtos::QuestionResponseDto,
            forum_dtos::QuestionDetailDto,
            forum_dtos::AnswerResponseDto,
            ApiResponse<Vec<forum_dtos::QuestionResponseDto>>,
            ApiResponse<forum_dtos::QuestionResponseDto>,
            ApiResponse<forum_dtos::QuestionDetailDto>,
            ApiResponse<forum_dtos::AnswerResponseDto>,
            // Search
            search_dtos::SearchResultDto,
            search_dtos::SearchResponseDto,
            ApiResponse<search_dtos::SearchResponseDto>,
            // Import jobs
            import_jobs_models::ImportJobStatus,
            import_jobs_dtos::ImportJobResponseDto,
            ApiResponse<Vec<import_jobs_dtos::ImportJobResponseDto>>,
            ApiResponse<import_jobs_dtos::ImportJobResponseDto>,
            // Admin
            admin_dtos::CleanupResponseDto,
            ApiResponse<admin_dtos::CleanupResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Category hierarchy (public reads, admin writes)"),
        (name = "articles", description = "Knowledge base articles"),
        (name = "forum", description = "Q&A forum"),
        (name = "search", description = "Full-text search over articles and questions"),
        (name = "import-jobs", description = "Bulk import job status"),
        (name = "admin", description = "Admin maintenance endpoints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Knowledge Base API",
        version = "0.1.0",
        description = "API documentation for the knowledge base service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
