//! Order and order item models.
//!
//! Orders are read-only from the API's point of view; the line total rule
//! lives here so every reader prices an item the same way.

use bigdecimal::{BigDecimal, Zero};
use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Lifecycle status of an order, stored as lowercase text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl diesel::query_builder::QueryId for OrderStatus {
    type QueryId = OrderStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for OrderStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for OrderStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            _ => Err(format!("Unrecognized order status: {}", s).into()),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub total: BigDecimal,
    pub subtotal: BigDecimal,
    pub taxes: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub shipped_at: Option<DateTime>,
    pub delivered_at: Option<DateTime>,
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
    pub discount_percentage: Option<BigDecimal>,
    pub discount_amount: Option<BigDecimal>,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl OrderItem {
    /// Line total derived from the item's price, quantity and discount.
    pub fn line_total(&self) -> BigDecimal {
        line_total(
            &self.unit_price,
            self.quantity,
            self.discount_amount.as_ref(),
            self.discount_percentage.as_ref(),
        )
    }
}

/// Prices an order line: `unit_price * quantity`, minus the absolute
/// discount when it is positive, otherwise minus the percentage discount
/// when that is positive. The absolute discount wins when both are set.
pub fn line_total(
    unit_price: &BigDecimal,
    quantity: i32,
    discount_amount: Option<&BigDecimal>,
    discount_percentage: Option<&BigDecimal>,
) -> BigDecimal {
    let gross = unit_price * BigDecimal::from(quantity);

    match (discount_amount, discount_percentage) {
        (Some(amount), _) if amount > &BigDecimal::zero() => gross - amount,
        (_, Some(percentage)) if percentage > &BigDecimal::zero() => {
            let discount = &gross * percentage / BigDecimal::from(100);
            gross - discount
        }
        _ => gross,
    }
}
