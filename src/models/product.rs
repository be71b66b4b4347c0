use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Product model for reading from database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub weight: Option<BigDecimal>,
    pub dimensions: Option<String>,
    pub active: bool,
    pub featured: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub weight: Option<BigDecimal>,
    pub dimensions: Option<String>,
    pub active: bool,
    pub featured: bool,
}

/// Full replacement of the editable product columns.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub weight: Option<BigDecimal>,
    pub dimensions: Option<String>,
    pub active: bool,
    pub featured: bool,
}

/// Row of the product/category association table.
#[derive(Debug, Insertable, Clone, Copy)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct NewProductCategory {
    pub product_id: i64,
    pub category_id: i64,
}
