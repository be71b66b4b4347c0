//! User repository for async database operations.
//!
//! Provides CRUD operations for the users table using diesel_async.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Returns
    /// The created user with generated id and timestamps
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a user by their ID.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists users ordered by id, optionally only active or inactive ones.
    ///
    /// # Returns
    /// Tuple of (users, total count matching the filter)
    pub async fn list_paginated(
        &self,
        active_filter: Option<bool>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut page_query = users.into_boxed();
        let mut count_query = users.into_boxed();
        if let Some(flag) = active_filter {
            page_query = page_query.filter(active.eq(flag));
            count_query = count_query.filter(active.eq(flag));
        }

        let items = page_query
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = count_query
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Replaces a user's editable fields.
    ///
    /// # Returns
    /// The updated user, or `None` when no user has that id
    pub async fn update(&self, user_id: i64, update_data: UpdateUser) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&update_data)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Marks a user inactive.
    ///
    /// # Returns
    /// The number of affected rows (0 or 1)
    pub async fn soft_delete(&self, user_id: i64) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(active.eq(false))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn count_orders(&self, owner_id: i64) -> AppResult<i64> {
        use crate::schema::orders::dsl::*;
        let mut conn = self.pool.get().await?;

        orders
            .filter(user_id.eq(owner_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
