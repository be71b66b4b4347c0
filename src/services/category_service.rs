//! Category service.

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory, UpdateCategory};
use crate::repositories::CategoryRepository;

/// A category with the number of products filed under it.
#[derive(Debug, Clone)]
pub struct CategoryDetails {
    pub category: Category,
    pub product_count: i64,
}

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self { repo }
    }

    /// # Errors
    /// `Duplicate` when a category with the same name exists
    pub async fn create_category(&self, new_category: NewCategory) -> AppResult<CategoryDetails> {
        let category = self.repo.create(new_category).await?;
        tracing::info!(category_id = category.id, name = %category.name, "Category created");
        Ok(CategoryDetails {
            category,
            product_count: 0,
        })
    }

    pub async fn get_category(&self, id: i64) -> AppResult<CategoryDetails> {
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))?;
        let product_count = self.repo.count_products(id).await?;
        Ok(CategoryDetails {
            category,
            product_count,
        })
    }

    pub async fn list_categories_paginated(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Category>, i64)> {
        self.repo.list_paginated(offset, limit).await
    }

    pub async fn list_active_categories(&self) -> AppResult<Vec<Category>> {
        self.repo.list_active().await
    }

    pub async fn update_category(
        &self,
        id: i64,
        update_data: UpdateCategory,
    ) -> AppResult<CategoryDetails> {
        let category = self
            .repo
            .update(id, update_data)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))?;
        let product_count = self.repo.count_products(id).await?;
        Ok(CategoryDetails {
            category,
            product_count,
        })
    }

    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        if self.repo.soft_delete(id).await? == 0 {
            return Err(AppError::not_found("category", id));
        }
        tracing::info!(category_id = id, "Category deactivated");
        Ok(())
    }
}
