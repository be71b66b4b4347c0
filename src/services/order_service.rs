//! Order service: read access to orders.

use bigdecimal::BigDecimal;

use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderItem};
use crate::repositories::{OrderRepository, UserRepository};

/// An order with its items and the sum of their line totals.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub items_subtotal: BigDecimal,
}

impl OrderDetails {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let items_subtotal = items.iter().map(OrderItem::line_total).sum();
        Self {
            order,
            items,
            items_subtotal,
        }
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    users: UserRepository,
}

impl OrderService {
    pub fn new(orders: OrderRepository, users: UserRepository) -> Self {
        Self { orders, users }
    }

    pub async fn get_order(&self, id: i64) -> AppResult<OrderDetails> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("order", id))?;
        let items = self.orders.find_items(id).await?;
        Ok(OrderDetails::new(order, items))
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    /// `NotFound` when the user does not exist
    pub async fn list_user_orders(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Order>, i64)> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user", user_id));
        }
        self.orders.find_by_user(user_id, offset, limit).await
    }
}
