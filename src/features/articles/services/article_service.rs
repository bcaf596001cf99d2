use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::articles::dtos::{
    ArticleDetailDto, ArticleFilter, ArticleResponseDto, CreateArticleDto, UpdateArticleDto,
};
use crate::features::articles::models::Article;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::services::CategoryService;
use crate::shared::constants::MAX_NAME_LENGTH;
use crate::shared::types::{FieldError, PaginationQuery};
use crate::shared::validation::SLUG_REGEX;

const ARTICLE_COLUMNS: &str =
    "id, title, slug, content, excerpt, status, author_id, view_count, created_at, updated_at";

/// Field-level checks shared by article create and update
fn validate_article_fields(title: &str, slug: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() as u64 > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title must not exceed {} characters", MAX_NAME_LENGTH),
        ));
    }

    if !SLUG_REGEX.is_match(slug) {
        errors.push(FieldError::new(
            "slug",
            "Slug must contain only lowercase letters, numbers and hyphens",
        ));
    }

    errors
}

/// Append filter constraints to a listing or count query. An absent filter
/// adds no constraint at all.
fn apply_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ArticleFilter) {
    if let Some(category_id) = filter.category_id {
        builder.push(" AND a.id IN (SELECT article_id FROM article_categories WHERE category_id = ");
        builder.push_bind(category_id);
        builder.push(")");
    }

    if let Some(ref query) = filter.query {
        // Matching and ranking are the database's job
        builder.push(" AND a.id IN (SELECT id FROM search_content(");
        builder.push_bind(query.clone());
        builder.push(") WHERE result_type = 'article')");
    }
}

/// Service for article operations
pub struct ArticleService {
    pool: PgPool,
    category_service: Arc<CategoryService>,
}

impl ArticleService {
    pub fn new(pool: PgPool, category_service: Arc<CategoryService>) -> Self {
        Self {
            pool,
            category_service,
        }
    }

    /// List articles, optionally filtered by category and free-text query
    pub async fn list(
        &self,
        filter: ArticleFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ArticleResponseDto>, i64)> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM articles a WHERE TRUE");
        apply_filters(&mut count_builder, &filter);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count articles: {:?}", e);
                AppError::Database(e)
            })?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.id, a.title, a.slug, a.content, a.excerpt, a.status, a.author_id, \
             a.view_count, a.created_at, a.updated_at FROM articles a WHERE TRUE",
        );
        apply_filters(&mut builder, &filter);
        builder.push(" ORDER BY a.created_at DESC OFFSET ");
        builder.push_bind(pagination.offset());
        builder.push(" LIMIT ");
        builder.push_bind(pagination.limit());

        let articles: Vec<Article> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list articles: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((articles.into_iter().map(|a| a.into()).collect(), total))
    }

    async fn fetch_article(&self, id: Uuid) -> Result<Article> {
        let query = format!("SELECT {} FROM articles WHERE id = $1", ARTICLE_COLUMNS);
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get article: {:?}", e);
                AppError::Database(e)
            })?;

        article.ok_or_else(|| AppError::NotFound(format!("Article '{}' not found", id)))
    }

    async fn fetch_category_ids(&self, article_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT category_id FROM article_categories WHERE article_id = $1",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get article categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ids)
    }

    /// Get an article with its categories and breadcrumb trail.
    ///
    /// The view counter is bumped fire-and-forget: the response does not wait
    /// for the write and a failed increment is only logged. Best-effort
    /// telemetry, no delivery guarantee.
    pub async fn get_detail(&self, id: Uuid) -> Result<ArticleDetailDto> {
        let (article, category_ids) =
            futures::try_join!(self.fetch_article(id), self.fetch_category_ids(id))?;

        let breadcrumbs = self
            .category_service
            .breadcrumbs_for(category_ids.first().copied(), &article.title)
            .await?;

        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
                .bind(id)
                .execute(&pool)
                .await;
            if let Err(e) = result {
                tracing::warn!("View count increment failed for article {}: {:?}", id, e);
            }
        });

        Ok(ArticleDetailDto {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            excerpt: article.excerpt,
            status: article.status,
            author_id: article.author_id,
            view_count: article.view_count,
            category_ids,
            breadcrumbs,
            created_at: article.created_at,
            updated_at: article.updated_at,
        })
    }

    async fn validate_category_ids(&self, category_ids: &[Uuid]) -> Result<()> {
        if category_ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE id = ANY($1)",
        )
        .bind(category_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check category ids: {:?}", e);
            AppError::Database(e)
        })?;

        if found != category_ids.len() as i64 {
            return Err(AppError::ValidationFields(vec![FieldError::new(
                "category_ids",
                "One or more categories do not exist",
            )]));
        }

        Ok(())
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check article slug: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(matches!(existing, Some(id) if Some(id) != exclude_id))
    }

    /// Replace the category associations of an article. Delete and insert
    /// are two separate statements; a failure in between leaves the article
    /// temporarily uncategorized.
    async fn replace_categories(&self, article_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear article categories: {:?}", e);
                AppError::Database(e)
            })?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO article_categories (article_id, category_id) ");
        builder.push_values(category_ids, |mut row, category_id| {
            row.push_bind(article_id).push_bind(category_id);
        });
        builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to set article categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// Create an article owned by the authenticated user
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateArticleDto,
    ) -> Result<ArticleResponseDto> {
        let errors = validate_article_fields(&dto.title, &dto.slug);
        if !errors.is_empty() {
            return Err(AppError::ValidationFields(errors));
        }

        self.validate_category_ids(&dto.category_ids).await?;

        if self.slug_taken(&dto.slug, None).await? {
            return Err(AppError::Conflict(format!(
                "Article slug '{}' already exists",
                dto.slug
            )));
        }

        let query = format!(
            "INSERT INTO articles (title, slug, content, excerpt, status, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ARTICLE_COLUMNS
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&dto.title)
            .bind(&dto.slug)
            .bind(&dto.content)
            .bind(&dto.excerpt)
            .bind(dto.status)
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create article: {:?}", e);
                AppError::Database(e)
            })?;

        self.replace_categories(article.id, &dto.category_ids).await?;

        tracing::info!("Article created: id={}, slug={}", article.id, article.slug);

        Ok(article.into())
    }

    /// Update an article (author or admin only)
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateArticleDto,
    ) -> Result<ArticleResponseDto> {
        let existing = self.fetch_article(id).await?;
        if !user.can_edit(&existing.author_id) {
            return Err(AppError::Forbidden(
                "Only the author or an admin may edit this article".to_string(),
            ));
        }

        let errors = validate_article_fields(&dto.title, &dto.slug);
        if !errors.is_empty() {
            return Err(AppError::ValidationFields(errors));
        }

        self.validate_category_ids(&dto.category_ids).await?;

        if self.slug_taken(&dto.slug, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Article slug '{}' already exists",
                dto.slug
            )));
        }

        let query = format!(
            "UPDATE articles \
             SET title = $1, slug = $2, content = $3, excerpt = $4, status = $5, \
                 updated_at = NOW() \
             WHERE id = $6 RETURNING {}",
            ARTICLE_COLUMNS
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&dto.title)
            .bind(&dto.slug)
            .bind(&dto.content)
            .bind(&dto.excerpt)
            .bind(dto.status)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update article: {:?}", e);
                AppError::Database(e)
            })?;

        self.replace_categories(id, &dto.category_ids).await?;

        Ok(article.into())
    }

    /// Delete an article (author or admin only)
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let existing = self.fetch_article(id).await?;
        if !user.can_edit(&existing.author_id) {
            return Err(AppError::Forbidden(
                "Only the author or an admin may delete this article".to_string(),
            ));
        }

        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete article: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Article deleted: id={}", id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_fields_pass() {
        assert!(validate_article_fields("Setting up the VPN", "vpn-setup").is_empty());
    }

    #[test]
    fn empty_title_and_bad_slug_are_both_reported() {
        let errors = validate_article_fields("  ", "Bad Slug!");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "slug"]);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let title = "t".repeat(MAX_NAME_LENGTH as usize + 1);
        let errors = validate_article_fields(&title, "ok-slug");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }
}
