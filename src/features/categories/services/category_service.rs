use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    BreadcrumbDto, CategoryDetailDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::features::categories::tree::{
    build_forest, index_by_id, parent_chain, MAX_CATEGORY_DEPTH,
};
use crate::shared::constants::MAX_NAME_LENGTH;
use crate::shared::types::FieldError;
use crate::shared::validation::SLUG_REGEX;

const CATEGORY_COLUMNS: &str =
    "id, parent_id, name, slug, description, sort_order, created_at, updated_at";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

/// Field-level checks for category create/update.
///
/// Slug uniqueness is not covered here; it is checked against the stored set
/// and surfaced as a conflict instead of a validation failure.
fn validate_category_fields(
    name: &str,
    slug: &str,
    parent_id: Option<Uuid>,
    self_id: Option<Uuid>,
    categories: &[Category],
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() as u64 > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            "name",
            format!("Name must not exceed {} characters", MAX_NAME_LENGTH),
        ));
    }

    if !SLUG_REGEX.is_match(slug) {
        errors.push(FieldError::new(
            "slug",
            "Slug must contain only lowercase letters, numbers and hyphens",
        ));
    }

    if let Some(parent_id) = parent_id {
        if Some(parent_id) == self_id {
            errors.push(FieldError::new(
                "parent_id",
                "A category cannot be its own ancestor",
            ));
            return errors;
        }

        let by_id = index_by_id(categories);
        if !by_id.contains_key(&parent_id) {
            errors.push(FieldError::new("parent_id", "Parent category does not exist"));
            return errors;
        }

        match parent_chain(parent_id, &by_id) {
            None => {
                errors.push(FieldError::new(
                    "parent_id",
                    "Parent chain is invalid or too deep",
                ));
            }
            Some(chain) => {
                if self_id.is_some_and(|id| chain.iter().any(|c| c.id == id)) {
                    errors.push(FieldError::new(
                        "parent_id",
                        "A category cannot be its own ancestor",
                    ));
                } else if chain.len() >= MAX_CATEGORY_DEPTH as usize {
                    // The parent already sits at the deepest level
                    errors.push(FieldError::new(
                        "parent_id",
                        format!(
                            "Nesting under this parent would exceed the maximum depth of {} levels",
                            MAX_CATEGORY_DEPTH
                        ),
                    ));
                }
            }
        }
    }

    errors
}

/// Case-sensitive exact slug collision check against the stored set,
/// skipping the category being updated.
fn slug_conflicts(slug: &str, exclude_id: Option<Uuid>, categories: &[Category]) -> bool {
    categories
        .iter()
        .any(|c| c.slug == slug && Some(c.id) != exclude_id)
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(categories)
    }

    async fn fetch_article_counts(&self) -> Result<HashMap<Uuid, i64>> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT category_id, COUNT(*) FROM article_categories GROUP BY category_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count articles per category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(counts.into_iter().collect())
    }

    /// List all categories (flat list, ordered by sort_order then name)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.fetch_all().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all categories as a depth-annotated tree with article counts
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.fetch_all().await?;
        let counts = self.fetch_article_counts().await?;

        Ok(build_forest(categories)
            .into_iter()
            .map(|node| CategoryTreeDto::from_node(node, &counts))
            .collect())
    }

    /// Get category by id, including its breadcrumb path
    pub async fn get(&self, id: Uuid) -> Result<CategoryDetailDto> {
        let categories = self.fetch_all().await?;
        let by_id = index_by_id(&categories);

        let category = by_id
            .get(&id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))?
            .clone();

        let chain = parent_chain(id, &by_id).ok_or_else(|| {
            tracing::error!("Category {} has a broken or cyclic parent chain", id);
            AppError::Internal(format!("Category '{}' has an invalid parent chain", id))
        })?;

        let mut breadcrumbs: Vec<BreadcrumbDto> = chain
            .iter()
            .take(chain.len() - 1)
            .map(|c| BreadcrumbDto {
                label: c.name.clone(),
                url: Some(format!("/categories/{}", c.slug)),
            })
            .collect();
        breadcrumbs.push(BreadcrumbDto {
            label: category.name.clone(),
            url: None,
        });

        Ok(CategoryDetailDto {
            category: category.into(),
            breadcrumbs,
        })
    }

    /// Breadcrumb trail for a page filed under `leaf_id`, ending with the
    /// page's own label. A missing leaf yields a single terminal entry.
    pub async fn breadcrumbs_for(
        &self,
        leaf_id: Option<Uuid>,
        terminal_label: &str,
    ) -> Result<Vec<BreadcrumbDto>> {
        let terminal = BreadcrumbDto {
            label: terminal_label.to_string(),
            url: None,
        };

        let Some(leaf_id) = leaf_id else {
            return Ok(vec![terminal]);
        };

        let categories = self.fetch_all().await?;
        let by_id = index_by_id(&categories);

        let Some(chain) = parent_chain(leaf_id, &by_id) else {
            // Broken chains degrade to the terminal entry rather than failing
            // the page that embeds the trail.
            tracing::warn!("Invalid parent chain for category {}", leaf_id);
            return Ok(vec![terminal]);
        };

        let mut breadcrumbs: Vec<BreadcrumbDto> = chain
            .iter()
            .map(|c| BreadcrumbDto {
                label: c.name.clone(),
                url: Some(format!("/categories/{}", c.slug)),
            })
            .collect();
        breadcrumbs.push(terminal);

        Ok(breadcrumbs)
    }

    /// Create a category (admin only)
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let categories = self.fetch_all().await?;

        let errors =
            validate_category_fields(&dto.name, &dto.slug, dto.parent_id, None, &categories);
        if !errors.is_empty() {
            return Err(AppError::ValidationFields(errors));
        }

        if slug_conflicts(&dto.slug, None, &categories) {
            return Err(AppError::Conflict(format!(
                "Category slug '{}' already exists",
                dto.slug
            )));
        }

        let query = format!(
            "INSERT INTO categories (name, slug, description, parent_id, sort_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&dto.name)
            .bind(&dto.slug)
            .bind(&dto.description)
            .bind(dto.parent_id)
            .bind(dto.sort_order)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }

    /// Update a category (admin only)
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let categories = self.fetch_all().await?;

        if !categories.iter().any(|c| c.id == id) {
            return Err(AppError::NotFound(format!("Category '{}' not found", id)));
        }

        let errors =
            validate_category_fields(&dto.name, &dto.slug, dto.parent_id, Some(id), &categories);
        if !errors.is_empty() {
            return Err(AppError::ValidationFields(errors));
        }

        if slug_conflicts(&dto.slug, Some(id), &categories) {
            return Err(AppError::Conflict(format!(
                "Category slug '{}' already exists",
                dto.slug
            )));
        }

        let query = format!(
            "UPDATE categories \
             SET name = $1, slug = $2, description = $3, parent_id = $4, sort_order = $5, \
                 updated_at = NOW() \
             WHERE id = $6 RETURNING {}",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&dto.name)
            .bind(&dto.slug)
            .bind(&dto.description)
            .bind(dto.parent_id)
            .bind(dto.sort_order)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update category: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(category.into())
    }

    /// Delete a category (admin only). Children are re-parented to the
    /// deleted node's parent first; the two writes are not atomic.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let parent_id = sqlx::query_as::<_, (Option<Uuid>,)>(
            "SELECT parent_id FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load category for delete: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))?
        .0;

        sqlx::query("UPDATE categories SET parent_id = $1, updated_at = NOW() WHERE parent_id = $2")
            .bind(parent_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to re-parent children of category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    fn category(name: &str, slug: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn field_names(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn accepts_a_valid_root_category() {
        let errors = validate_category_fields("Guides", "guides", None, None, &[]);
        assert!(errors.is_empty());
    }

    #[test]
    fn rejects_empty_and_overlong_names() {
        let errors = validate_category_fields("   ", "guides", None, None, &[]);
        assert_eq!(field_names(&errors), vec!["name"]);

        let long_name = "x".repeat(MAX_NAME_LENGTH as usize + 1);
        let errors = validate_category_fields(&long_name, "guides", None, None, &[]);
        assert_eq!(field_names(&errors), vec!["name"]);
    }

    #[test]
    fn rejects_malformed_slugs() {
        let errors = validate_category_fields("Guides", "Guides!", None, None, &[]);
        assert_eq!(field_names(&errors), vec!["slug"]);
    }

    #[test]
    fn rejects_missing_parent() {
        let errors =
            validate_category_fields("Guides", "guides", Some(Uuid::new_v4()), None, &[]);
        assert_eq!(field_names(&errors), vec!["parent_id"]);
    }

    #[test]
    fn allows_depth_two_but_rejects_depth_three() {
        // A (root) -> B -> C
        let a = category("A", "a", None);
        let b = category("B", "b", Some(a.id));
        let c = category("C", "c", Some(b.id));
        let all = vec![a, b.clone(), c.clone()];

        // D under B lands at depth 2: fine
        let errors = validate_category_fields("D", "d", Some(b.id), None, &all);
        assert!(errors.is_empty());

        // D under C would be a fourth level: rejected
        let errors = validate_category_fields("D", "d", Some(c.id), None, &all);
        assert_eq!(field_names(&errors), vec!["parent_id"]);
        assert!(errors[0].message.contains("depth"));
    }

    #[test]
    fn rejects_self_as_parent() {
        let a = category("A", "a", None);
        let errors =
            validate_category_fields("A", "a", Some(a.id), Some(a.id), &[a.clone()]);
        assert_eq!(field_names(&errors), vec!["parent_id"]);
    }

    #[test]
    fn rejects_reparenting_under_own_descendant() {
        let a = category("A", "a", None);
        let b = category("B", "b", Some(a.id));
        let all = vec![a.clone(), b.clone()];

        // Moving A under its own child B would create a cycle
        let errors = validate_category_fields("A", "a", Some(b.id), Some(a.id), &all);
        assert_eq!(field_names(&errors), vec!["parent_id"]);
        assert!(errors[0].message.contains("ancestor"));
    }

    #[test]
    fn cyclic_existing_data_is_reported_not_looped() {
        let mut a = category("A", "a", None);
        let b = category("B", "b", Some(a.id));
        a.parent_id = Some(b.id);
        let all = vec![a.clone(), b.clone()];

        let errors = validate_category_fields("C", "c", Some(b.id), None, &all);
        assert_eq!(field_names(&errors), vec!["parent_id"]);
    }

    #[test]
    fn multiple_field_errors_are_reported_together() {
        let errors = validate_category_fields("", "Bad Slug", None, None, &[]);
        assert_eq!(field_names(&errors), vec!["name", "slug"]);
    }

    #[test]
    fn slug_conflicts_only_on_exact_case_sensitive_match() {
        let all = vec![category("Guides", "guides", None)];

        assert!(slug_conflicts("guides", None, &all));
        assert!(!slug_conflicts("Guides", None, &all));
        assert!(!slug_conflicts("guide", None, &all));
        assert!(!slug_conflicts("guides-2", None, &all));
    }

    #[test]
    fn updating_a_category_does_not_conflict_with_its_own_slug() {
        let a = category("Guides", "guides", None);
        let b = category("FAQ", "faq", None);
        let all = vec![a.clone(), b.clone()];

        // Keeping its own slug is fine, taking another category's is not
        assert!(!slug_conflicts("guides", Some(a.id), &all));
        assert!(slug_conflicts("faq", Some(a.id), &all));
    }
}
