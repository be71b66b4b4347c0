//! User service for business logic operations.
//!
//! Provides a higher-level API for user operations, encapsulating
//! business rules and coordinating with the repository layer.

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;

/// A user together with the number of orders they have placed.
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user: User,
    pub total_orders: i64,
}

/// User service for handling user-related business logic.
///
/// Since `UserRepository` uses `Arc` internally via the connection pool,
/// cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Creates a new user.
    ///
    /// # Errors
    /// `Duplicate` when the email is already registered
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<UserDetails> {
        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(UserDetails {
            user,
            total_orders: 0,
        })
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i64) -> AppResult<UserDetails> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))?;
        let total_orders = self.repo.count_orders(id).await?;
        Ok(UserDetails { user, total_orders })
    }

    /// Lists users with pagination.
    ///
    /// # Returns
    /// A tuple of (users, total_count)
    pub async fn list_users_paginated(
        &self,
        active: Option<bool>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        self.repo.list_paginated(active, offset, limit).await
    }

    /// Replaces a user's editable fields.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Duplicate` when the new email is taken
    pub async fn update_user(&self, id: i64, update_data: UpdateUser) -> AppResult<UserDetails> {
        let user = self
            .repo
            .update(id, update_data)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))?;
        let total_orders = self.repo.count_orders(id).await?;
        Ok(UserDetails { user, total_orders })
    }

    /// Deactivates a user. The row and its orders are kept.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let affected = self.repo.soft_delete(id).await?;
        if affected == 0 {
            return Err(AppError::not_found("user", id));
        }
        tracing::info!(user_id = id, "User deactivated");
        Ok(())
    }
}
