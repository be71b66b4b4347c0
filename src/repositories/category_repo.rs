//! Category repository for async database operations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory, UpdateCategory};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: AsyncDbPool,
}

impl CategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(categories)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, category_id: i64) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .filter(id.eq(category_id))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists categories ordered by id.
    ///
    /// # Returns
    /// Tuple of (categories, total count)
    pub async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<Category>, i64)> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        let items = categories
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = categories
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// All active categories, alphabetically.
    pub async fn list_active(&self) -> AppResult<Vec<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .filter(active.eq(true))
            .order(name.asc())
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        category_id: i64,
        update_data: UpdateCategory,
    ) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(categories.filter(id.eq(category_id)))
            .set(&update_data)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn soft_delete(&self, category_id: i64) -> AppResult<usize> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(categories.filter(id.eq(category_id)))
            .set(active.eq(false))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Number of products associated with a category.
    pub async fn count_products(&self, category: i64) -> AppResult<i64> {
        use crate::schema::product_categories::dsl::*;
        let mut conn = self.pool.get().await?;

        product_categories
            .filter(category_id.eq(category))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
