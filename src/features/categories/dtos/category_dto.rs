use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::categories::tree::CategoryNode;

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryDto {
    pub name: String,
    /// URL-safe identifier, must match `^[a-z0-9-]+$`
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Request DTO for updating a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryDto {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            sort_order: c.sort_order,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    /// Levels below the root (root = 0)
    pub depth: u8,
    /// Number of articles associated with this category
    pub article_count: i64,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    pub fn from_node(
        node: CategoryNode,
        counts: &std::collections::HashMap<Uuid, i64>,
    ) -> CategoryTreeDto {
        let article_count = counts.get(&node.category.id).copied().unwrap_or(0);
        CategoryTreeDto {
            id: node.category.id,
            name: node.category.name,
            slug: node.category.slug,
            description: node.category.description,
            sort_order: node.category.sort_order,
            depth: node.depth,
            article_count,
            children: node
                .children
                .into_iter()
                .map(|child| Self::from_node(child, counts))
                .collect(),
        }
    }
}

/// Listing payload: a flat list by default, a hierarchical forest when the
/// caller asks for `?tree=true`. Untagged, so both shapes serialize as a bare
/// JSON array in the response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListingDto {
    Flat(Vec<CategoryResponseDto>),
    Tree(Vec<CategoryTreeDto>),
}

/// One entry in a breadcrumb trail, ordered root to current page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BreadcrumbDto {
    pub label: String,
    /// Absent for the terminal (current page) entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response DTO for a single category, including its breadcrumb path
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub breadcrumbs: Vec<BreadcrumbDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_listing_shapes_serialize_as_a_bare_array() {
        let flat = CategoryListingDto::Flat(vec![CategoryResponseDto {
            id: Uuid::new_v4(),
            parent_id: None,
            name: "Guides".to_string(),
            slug: "guides".to_string(),
            description: None,
            sort_order: 0,
        }]);
        let value = serde_json::to_value(&flat).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["slug"], "guides");

        let tree = CategoryListingDto::Tree(vec![CategoryTreeDto {
            id: Uuid::new_v4(),
            name: "Guides".to_string(),
            slug: "guides".to_string(),
            description: None,
            sort_order: 0,
            depth: 0,
            article_count: 3,
            children: Vec::new(),
        }]);
        let value = serde_json::to_value(&tree).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["depth"], 0);
        assert_eq!(value[0]["article_count"], 3);
    }
}
