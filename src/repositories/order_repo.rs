//! Order repository: read access to orders and their items.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderItem};

#[derive(Clone)]
pub struct OrderRepository {
    pool: AsyncDbPool,
}

impl OrderRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, order_id: i64) -> AppResult<Option<Order>> {
        use crate::schema::orders::dsl::*;
        let mut conn = self.pool.get().await?;

        orders
            .filter(id.eq(order_id))
            .select(Order::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Items of an order in insertion order.
    pub async fn find_items(&self, parent_id: i64) -> AppResult<Vec<OrderItem>> {
        use crate::schema::order_items::dsl::*;
        let mut conn = self.pool.get().await?;

        order_items
            .filter(order_id.eq(parent_id))
            .order(id.asc())
            .select(OrderItem::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// A user's orders, newest first.
    ///
    /// # Returns
    /// Tuple of (orders, total count for the user)
    pub async fn find_by_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Order>, i64)> {
        use crate::schema::orders::dsl::*;
        let mut conn = self.pool.get().await?;

        let items = orders
            .filter(user_id.eq(owner_id))
            .order((created_at.desc(), id.desc()))
            .offset(offset)
            .limit(limit)
            .select(Order::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total_count = orders
            .filter(user_id.eq(owner_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total_count))
    }
}
