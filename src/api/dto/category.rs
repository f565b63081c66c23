//! Category DTOs for API requests and responses.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Category, CategoryPatch, CategoryType, NewCategory};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(
        min = 3,
        max = 128,
        message = "category name must be from 3 to 128 symbols long"
    ))]
    #[schema(min_length = 3, max_length = 128, example = "Groceries")]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 256, message = "category description must be at most 256 symbols long"))]
    #[schema(max_length = 256)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl CreateCategoryRequest {
    /// Converts the request into an insertable category owned by `owner_id`.
    pub fn into_new_category(self, owner_id: i64) -> NewCategory {
        NewCategory {
            user_id: owner_id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            category_type: self.category_type,
        }
    }
}

/// Request body for a partial category update.
///
/// Absent and `null` fields are left untouched. Length rules are applied by
/// the category service.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    #[schema(example = "Food")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateCategoryRequest> for CategoryPatch {
    fn from(request: UpdateCategoryRequest) -> Self {
        CategoryPatch {
            name: request.name,
            description: request.description,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Category as returned to clients. The soft-delete marker is never exposed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            user_id: category.user_id,
            name: category.name,
            description: category.description,
            category_type: category.category_type,
            created_at: category.created_at.to_jiff(),
            updated_at: category.updated_at.to_jiff(),
        }
    }
}
