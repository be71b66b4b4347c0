//! Order DTOs (read-only).

use crate::models::{Order, OrderItem, OrderStatus};
use crate::services::OrderDetails;
use bigdecimal::BigDecimal;
use jiff::civil::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    #[schema(value_type = String, example = "129.90")]
    pub total: BigDecimal,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub taxes: BigDecimal,
    #[schema(value_type = String)]
    pub shipping_cost: BigDecimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub created_at: DateTime,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub updated_at: DateTime,
    #[schema(value_type = Option<String>)]
    pub shipped_at: Option<DateTime>,
    #[schema(value_type = Option<String>)]
    pub delivered_at: Option<DateTime>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            total: order.total,
            subtotal: order.subtotal,
            taxes: order.taxes,
            shipping_cost: order.shipping_cost,
            status: order.status,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            notes: order.notes,
            created_at: order.created_at.to_jiff(),
            updated_at: order.updated_at.to_jiff(),
            shipped_at: order.shipped_at.map(|t| t.to_jiff()),
            delivered_at: order.delivered_at.map(|t| t.to_jiff()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub unit_price: BigDecimal,
    /// Stored total of the line
    #[schema(value_type = String)]
    pub total_price: BigDecimal,
    /// Line total recomputed from price, quantity and discount
    #[schema(value_type = String)]
    pub line_total: BigDecimal,
    #[schema(value_type = Option<String>)]
    pub discount_percentage: Option<BigDecimal>,
    #[schema(value_type = Option<String>)]
    pub discount_amount: Option<BigDecimal>,
    pub notes: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            line_total: item.line_total(),
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            discount_percentage: item.discount_percentage,
            discount_amount: item.discount_amount,
            notes: item.notes,
        }
    }
}

/// An order together with its items.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    /// Sum of the item line totals
    #[schema(value_type = String, example = "119.90")]
    pub items_subtotal: BigDecimal,
}

impl From<OrderDetails> for OrderDetailResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order.into(),
            items: details.items.into_iter().map(Into::into).collect(),
            items_subtotal: details.items_subtotal,
        }
    }
}
