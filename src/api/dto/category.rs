//! Category DTOs.

use crate::models::{Category, CategoryRef, NewCategory, UpdateCategory};
use crate::services::CategoryDetails;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating or replacing a category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(min_length = 2, max_length = 100, example = "Laptops")]
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name,
            description: self.description,
        }
    }

    pub fn into_update_category(self) -> UpdateCategory {
        UpdateCategory {
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// Number of products in the category; omitted in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub created_at: DateTime,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub updated_at: DateTime,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            active: category.active,
            product_count: None,
            created_at: category.created_at.to_jiff(),
            updated_at: category.updated_at.to_jiff(),
        }
    }
}

impl From<CategoryDetails> for CategoryResponse {
    fn from(details: CategoryDetails) -> Self {
        Self {
            product_count: Some(details.product_count),
            ..Self::from(details.category)
        }
    }
}

/// A category as embedded in a product.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRefResponse {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRef> for CategoryRefResponse {
    fn from(category: CategoryRef) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}
