//! Product search DTOs.
//!
//! Search speaks camelCase on the wire, unlike the CRUD endpoints.

use crate::config::SearchConfig;
use crate::error::{AppError, AppResult};
use crate::search::{PageRequest, ProductSummary, SearchCriteria, SearchPage};
use bigdecimal::BigDecimal;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Search criteria. Every field is optional and present fields are AND-ed.
///
/// Unknown `sortField` or `sortDirection` values are not rejected; they
/// select the default ordering.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "brand": "lenovo",
    "minPrice": 500,
    "maxPrice": 2000,
    "categoryNames": ["laptops"],
    "freeTextQuery": "thinkpad",
    "sortField": "price",
    "sortDirection": "asc"
}))]
pub struct ProductSearchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<String>,
    #[serde(default, with = "super::decimal::option")]
    #[schema(value_type = Option<String>)]
    pub min_price: Option<BigDecimal>,
    #[serde(default, with = "super::decimal::option")]
    #[schema(value_type = Option<String>)]
    pub max_price: Option<BigDecimal>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    #[serde(default, with = "super::decimal::option")]
    #[schema(value_type = Option<String>)]
    pub min_weight: Option<BigDecimal>,
    #[serde(default, with = "super::decimal::option")]
    #[schema(value_type = Option<String>)]
    pub max_weight: Option<BigDecimal>,
    /// Matches name, description, brand, model or any category name
    pub free_text_query: Option<String>,
    pub category_ids: Option<Vec<i64>>,
    /// Matched case-insensitively against category names
    pub category_names: Option<Vec<String>>,
    /// One of name, brand, model, price, stock, weight, createdAt
    #[schema(example = "price")]
    pub sort_field: Option<String>,
    /// asc or desc; desc when omitted
    #[schema(example = "desc")]
    pub sort_direction: Option<String>,
}

impl From<ProductSearchRequest> for SearchCriteria {
    fn from(request: ProductSearchRequest) -> Self {
        SearchCriteria {
            name: request.name,
            description: request.description,
            brand: request.brand,
            model: request.model,
            dimensions: request.dimensions,
            min_price: request.min_price,
            max_price: request.max_price,
            min_stock: request.min_stock,
            max_stock: request.max_stock,
            active: request.active,
            featured: request.featured,
            min_weight: request.min_weight,
            max_weight: request.max_weight,
            free_text_query: request.free_text_query,
            category_ids: request.category_ids.unwrap_or_default(),
            category_names: request.category_names.unwrap_or_default(),
            sort_field: request.sort_field,
            sort_direction: request.sort_direction,
        }
    }
}

/// Zero-based paging for search.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct SearchPageParams {
    /// Page index, starting at 0
    #[serde(default)]
    #[param(minimum = 0, example = 0)]
    pub page: u32,

    /// Page size; the configured default applies when omitted
    #[validate(range(min = 1, max = 100, message = "Size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub size: Option<u32>,
}

impl SearchPageParams {
    /// Resolves the page against the configured default and ceiling.
    ///
    /// # Errors
    /// `BadRequest` when `size` exceeds `max_page_size`
    pub fn page_request(&self, config: &SearchConfig) -> AppResult<PageRequest> {
        let size = self.size.unwrap_or(config.default_page_size);
        if size > config.max_page_size {
            return Err(AppError::BadRequest {
                message: format!(
                    "Page size {} exceeds the maximum of {}",
                    size, config.max_page_size
                ),
            });
        }
        Ok(PageRequest::new(self.page, size))
    }
}

/// One search hit.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1499.99")]
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(value_type = Option<String>)]
    pub weight: Option<BigDecimal>,
    pub dimensions: Option<String>,
    pub active: bool,
    pub featured: bool,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub created_at: DateTime,
    #[schema(value_type = String, example = "2025-01-10T09:30:00")]
    pub updated_at: DateTime,
    /// Category names joined with ", "
    #[schema(example = "Laptops, Business")]
    pub category_names: String,
    /// Category ids joined with ", "
    #[schema(example = "3, 7")]
    pub category_ids: String,
    /// Present only when the search carried a free-text query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(summary: ProductSummary) -> Self {
        let category_names = summary.category_names();
        let category_ids = summary.category_ids();
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
            created_at: product.created_at.to_jiff(),
            updated_at: product.updated_at.to_jiff(),
            category_names,
            category_ids,
            relevance_score: summary.relevance_score,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPageResponse {
    pub items: Vec<ProductSummaryResponse>,
    /// Number of matching products across all pages
    pub total_count: u64,
    pub page_index: u32,
    pub page_size: u32,
}

impl From<SearchPage> for SearchPageResponse {
    fn from(page: SearchPage) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
            page_index: page.page_index,
            page_size: page.page_size,
        }
    }
}
