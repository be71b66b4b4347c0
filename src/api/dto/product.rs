//! Product DTOs for the catalog maintenance endpoints.

use super::CategoryRefResponse;
use crate::models::{NewProduct, UpdateProduct};
use crate::search::ProductSummary;
use bigdecimal::{BigDecimal, Zero};
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 2, max = 200, message = "Name must be between 2 and 200 characters"))]
    #[schema(example = "ThinkPad X1 Carbon")]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
    #[serde(with = "super::decimal")]
    #[validate(custom(function = "validate_positive", message = "Price must be greater than 0"))]
    #[schema(value_type = String, example = "1499.99")]
    pub price: BigDecimal,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[validate(length(max = 500, message = "Image URL must not exceed 500 characters"))]
    pub image_url: Option<String>,
    #[validate(length(max = 50, message = "Brand must not exceed 50 characters"))]
    pub brand: Option<String>,
    #[validate(length(max = 100, message = "Model must not exceed 100 characters"))]
    pub model: Option<String>,
    #[serde(default, with = "super::decimal::option")]
    #[validate(custom(function = "validate_non_negative", message = "Weight cannot be negative"))]
    #[schema(value_type = Option<String>, example = "1.120")]
    pub weight: Option<BigDecimal>,
    #[validate(length(max = 100, message = "Dimensions must not exceed 100 characters"))]
    pub dimensions: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
    /// Categories to link; unknown ids are ignored. On update, omitting the
    /// field keeps the current categories and an empty list clears them.
    pub category_ids: Option<Vec<i64>>,
}

fn default_active() -> bool {
    true
}

fn validate_positive(value: &BigDecimal) -> Result<(), ValidationError> {
    if value > &BigDecimal::zero() {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

fn validate_non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    if value < &BigDecimal::zero() {
        Err(ValidationError::new("non_negative"))
    } else {
        Ok(())
    }
}

impl ProductRequest {
    /// Splits the request into the product row and the category ids to link.
    pub fn into_new_product(self) -> (NewProduct, Vec<i64>) {
        let product = NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image_url: self.image_url,
            brand: self.brand,
            model: self.model,
            weight: self.weight,
            dimensions: self.dimensions,
            active: self.active,
            featured: self.featured,
        };
        (product, self.category_ids.unwrap_or_default())
    }

    pub fn into_update_product(self) -> (UpdateProduct, Option<Vec<i64>>) {
        let product = UpdateProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image_url: self.image_url,
            brand: self.brand,
            model: self.model,
            weight: self.weight,
            dimensions: self.dimensions,
            active: self.active,
            featured: self.featured,
        };
        (product, self.category_ids)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1499.99")]
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(value_type = Option<String>, example = "1.120")]
    pub weight: Option<BigDecimal>,
    pub dimensions: Option<String>,
    pub active: bool,
    pub featured: bool,
    pub categories: Vec<CategoryRefResponse>,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub created_at: DateTime,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub updated_at: DateTime,
}

impl From<ProductSummary> for ProductResponse {
    fn from(summary: ProductSummary) -> Self {
        let product = summary.product;
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            brand: product.brand,
            model: product.model,
            weight: product.weight,
            dimensions: product.dimensions,
            active: product.active,
            featured: product.featured,
            categories: summary
                .categories
                .into_iter()
                .map(CategoryRefResponse::from)
                .collect(),
            created_at: product.created_at.to_jiff(),
            updated_at: product.updated_at.to_jiff(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> ProductRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults_when_fields_omitted() {
        let request = parse(json!({ "name": "Desk Lamp", "price": "19.90", "stock": 4 }));
        assert!(request.validate().is_ok());
        assert!(request.active);
        assert!(!request.featured);

        let (_, category_ids) = request.into_new_product();
        assert!(category_ids.is_empty());
    }

    #[test]
    fn test_price_must_be_positive() {
        let request = parse(json!({ "name": "Freebie", "price": "0", "stock": 1 }));
        let errors = request.validate().unwrap_err();
        let price = &errors.field_errors()["price"][0];
        assert_eq!(price.message.as_deref(), Some("Price must be greater than 0"));
    }

    #[test]
    fn test_weight_and_stock_bounds() {
        let request = parse(json!({
            "name": "Anvil",
            "price": "80.00",
            "stock": -1,
            "weight": "-0.5"
        }));
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("stock"));
        assert!(fields.contains_key("weight"));

        let zero_weight = parse(json!({ "name": "Anvil", "price": "80.00", "stock": 0, "weight": "0" }));
        assert!(zero_weight.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_category_presence() {
        let keep = parse(json!({ "name": "Lamp", "price": "5", "stock": 1 }));
        assert_eq!(keep.into_update_product().1, None);

        let clear = parse(json!({ "name": "Lamp", "price": "5", "stock": 1, "category_ids": [] }));
        assert_eq!(clear.into_update_product().1, Some(vec![]));
    }
}
