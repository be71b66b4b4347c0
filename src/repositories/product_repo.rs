//! Product repository: CRUD, category associations and search.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{count_distinct, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Double, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{CategoryRef, NewProduct, NewProductCategory, Product, UpdateProduct};
use crate::schema::{categories, product_categories, products};
use crate::search::{
    BRAND_WEIGHT, CATEGORY_WEIGHT, CatalogPage, CatalogRow, CatalogSource, DESCRIPTION_WEIGHT,
    MODEL_WEIGHT, NAME_WEIGHT, PageRequest, SearchCriteria, SortDirection, SortKey, SortPlan,
    SortSpec,
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: AsyncDbPool,
}

impl ProductRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a product and links it to the given categories in one
    /// transaction. Ids that name no category are skipped.
    ///
    /// # Returns
    /// The created product and the categories it was linked to
    pub async fn create(
        &self,
        new_product: NewProduct,
        category_ids: Vec<i64>,
    ) -> AppResult<(Product, Vec<CategoryRef>)> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let product = diesel::insert_into(products::table)
                    .values(&new_product)
                    .returning(Product::as_returning())
                    .get_result(conn)
                    .await?;

                let linked = link_categories(conn, product.id, category_ids).await?;
                Ok((product, linked))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find_by_id(&self, product_id: i64) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        products::table
            .filter(products::id.eq(product_id))
            .select(Product::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists products ordered by id.
    ///
    /// # Returns
    /// Tuple of (products, total count)
    pub async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<Product>, i64)> {
        let mut conn = self.pool.get().await?;

        let items = products::table
            .order(products::id.asc())
            .offset(offset)
            .limit(limit)
            .select(Product::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = products::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Categories of each given product, keyed by product id.
    pub async fn find_categories(
        &self,
        product_ids: Vec<i64>,
    ) -> AppResult<HashMap<i64, Vec<CategoryRef>>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await?;
        categories_by_product(&mut conn, product_ids).await
    }

    /// Replaces a product's columns and, when `category_ids` is given, its
    /// whole category set.
    ///
    /// # Returns
    /// `None` when no product has that id
    pub async fn update(
        &self,
        product_id: i64,
        update_data: UpdateProduct,
        category_ids: Option<Vec<i64>>,
    ) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                    .set(&update_data)
                    .returning(Product::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                if let (Some(product), Some(ids)) = (&updated, category_ids) {
                    diesel::delete(
                        product_categories::table
                            .filter(product_categories::product_id.eq(product.id)),
                    )
                    .execute(conn)
                    .await?;
                    link_categories(conn, product.id, ids).await?;
                }

                Ok(updated)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn soft_delete(&self, product_id: i64) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(products::active.eq(false))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Runs a product search in PostgreSQL.
    ///
    /// Filters, ordering, `LIMIT`/`OFFSET` and the distinct-product count
    /// all run in SQL. Categories are then loaded only for the products on
    /// the requested page.
    pub async fn search_page(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> AppResult<CatalogPage> {
        let mut conn = self.pool.get().await?;

        let total: i64 = filtered_products(criteria)
            .select(count_distinct(products::id))
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count search results"))?;
        let total_count = u64::try_from(total).unwrap_or_default();

        if total_count <= page.offset() as u64 {
            return Ok(CatalogPage {
                rows: Vec::new(),
                total_count,
            });
        }

        let on_page: Vec<Product> = page_query(criteria, page)
            .select(Product::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "load search page"))?;

        let product_ids = on_page.iter().map(|p| p.id).collect::<Vec<_>>();
        let mut by_product = categories_by_product(&mut conn, product_ids).await?;

        tracing::debug!(total_count, on_page = on_page.len(), "Loaded search page");

        Ok(CatalogPage {
            rows: on_page
                .into_iter()
                .flat_map(|product| {
                    let categories = by_product.remove(&product.id).unwrap_or_default();
                    join_rows(product, categories)
                })
                .collect(),
            total_count,
        })
    }
}

#[async_trait]
impl CatalogSource for ProductRepository {
    async fn fetch_page(&self, criteria: &SearchCriteria, page: PageRequest) -> AppResult<CatalogPage> {
        self.search_page(criteria, page).await
    }
}

diesel::define_sql_function!(fn lower(x: Text) -> Text);

type ProductQuery = products::BoxedQuery<'static, Pg>;

/// Products matching every criterion, unordered.
fn filtered_products(criteria: &SearchCriteria) -> ProductQuery {
    let mut query = products::table.into_boxed();

    if let Some(name) = criteria.name_filter() {
        query = query.filter(products::name.ilike(contains_pattern(name)));
    }
    if let Some(description) = criteria.description_filter() {
        query = query.filter(
            products::description
                .assume_not_null()
                .ilike(contains_pattern(description)),
        );
    }
    if let Some(brand) = criteria.brand_filter() {
        query = query.filter(products::brand.assume_not_null().ilike(contains_pattern(brand)));
    }
    if let Some(model) = criteria.model_filter() {
        query = query.filter(products::model.assume_not_null().ilike(contains_pattern(model)));
    }
    if let Some(dimensions) = criteria.dimensions_filter() {
        query = query.filter(
            products::dimensions
                .assume_not_null()
                .ilike(contains_pattern(dimensions)),
        );
    }
    if let Some(min) = &criteria.min_price {
        query = query.filter(products::price.ge(min.clone()));
    }
    if let Some(max) = &criteria.max_price {
        query = query.filter(products::price.le(max.clone()));
    }
    if let Some(min) = criteria.min_stock {
        query = query.filter(products::stock.ge(min));
    }
    if let Some(max) = criteria.max_stock {
        query = query.filter(products::stock.le(max));
    }
    if let Some(min) = &criteria.min_weight {
        query = query.filter(products::weight.assume_not_null().ge(min.clone()));
    }
    if let Some(max) = &criteria.max_weight {
        query = query.filter(products::weight.assume_not_null().le(max.clone()));
    }
    if let Some(active) = criteria.active {
        query = query.filter(products::active.eq(active));
    }
    if let Some(featured) = criteria.featured {
        query = query.filter(products::featured.eq(featured));
    }

    // Ids and names are alternatives: a product in any wanted category matches.
    let names: Vec<String> = criteria
        .category_name_filter()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    if !criteria.category_ids.is_empty() || !names.is_empty() {
        query = query.filter(
            products::id.eq_any(
                product_categories::table
                    .inner_join(categories::table)
                    .filter(
                        product_categories::category_id
                            .eq_any(criteria.category_ids.clone())
                            .or(lower(categories::name).eq_any(names)),
                    )
                    .select(product_categories::product_id),
            ),
        );
    }

    if let Some(text) = criteria.free_text() {
        let pattern = contains_pattern(text);
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.assume_not_null().ilike(pattern.clone()))
                .or(products::brand.assume_not_null().ilike(pattern.clone()))
                .or(products::model.assume_not_null().ilike(pattern.clone()))
                .or(products::id.eq_any(
                    product_categories::table
                        .inner_join(categories::table)
                        .filter(categories::name.ilike(pattern))
                        .select(product_categories::product_id),
                )),
        );
    }

    query
}

/// One page of matching products in result order: the requested sort key,
/// relevance when there is free text, newest first, highest id last.
fn page_query(criteria: &SearchCriteria, page: PageRequest) -> ProductQuery {
    let plan = SortPlan::resolve(criteria);
    let mut query = filtered_products(criteria);

    if let Some(spec) = plan.spec() {
        query = order_by_key(query, spec);
    }
    if let Some(text) = criteria.free_text() {
        query = order_by_relevance(query, text);
    }

    query
        .then_order_by(products::created_at.desc())
        .then_order_by(products::id.desc())
        .limit(i64::from(page.size()))
        .offset(page.offset() as i64)
}

macro_rules! then_order {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $query.then_order_by($column.asc().nulls_last()),
            SortDirection::Desc => $query.then_order_by($column.desc().nulls_last()),
        }
    };
}

/// Text keys compare lowercased; missing values go last either way.
fn order_by_key(query: ProductQuery, spec: SortSpec) -> ProductQuery {
    let direction = spec.direction;
    match spec.key {
        SortKey::Name => then_order!(query, lower(products::name), direction),
        SortKey::Brand => then_order!(query, lower(products::brand.assume_not_null()), direction),
        SortKey::Model => then_order!(query, lower(products::model.assume_not_null()), direction),
        SortKey::Price => then_order!(query, products::price, direction),
        SortKey::Stock => then_order!(query, products::stock, direction),
        SortKey::Weight => then_order!(query, products::weight, direction),
        SortKey::CreatedAt => then_order!(query, products::created_at, direction),
    }
}

/// Highest relevance first, scored with the same weights the search
/// evaluator reports.
fn order_by_relevance(query: ProductQuery, text: &str) -> ProductQuery {
    let pattern = contains_pattern(text);
    let score = sql::<Double>("(CASE WHEN products.name ILIKE ")
        .bind::<Text, _>(pattern.clone())
        .sql(&format!(" THEN {NAME_WEIGHT:?} ELSE 0 END + CASE WHEN products.brand ILIKE "))
        .bind::<Text, _>(pattern.clone())
        .sql(&format!(
            " THEN {BRAND_WEIGHT:?} ELSE 0 END + CASE WHEN products.description ILIKE "
        ))
        .bind::<Text, _>(pattern.clone())
        .sql(&format!(
            " THEN {DESCRIPTION_WEIGHT:?} ELSE 0 END + CASE WHEN products.model ILIKE "
        ))
        .bind::<Text, _>(pattern.clone())
        .sql(&format!(
            " THEN {MODEL_WEIGHT:?} ELSE 0 END + {CATEGORY_WEIGHT:?} * (\
             SELECT count(*) FROM product_categories pc \
             JOIN categories c ON c.id = pc.category_id \
             WHERE pc.product_id = products.id AND c.name ILIKE "
        ))
        .bind::<Text, _>(pattern)
        .sql("))");

    query.then_order_by(score.desc())
}

/// Inserts association rows for the ids that name an existing category.
async fn link_categories(
    conn: &mut AsyncPgConnection,
    product: i64,
    category_ids: Vec<i64>,
) -> AppResult<Vec<CategoryRef>> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let existing: Vec<CategoryRef> = categories::table
        .filter(categories::id.eq_any(category_ids))
        .order(categories::id.asc())
        .select((categories::id, categories::name))
        .load(conn)
        .await?;

    let links: Vec<NewProductCategory> = existing
        .iter()
        .map(|category| NewProductCategory {
            product_id: product,
            category_id: category.id,
        })
        .collect();

    if !links.is_empty() {
        diesel::insert_into(product_categories::table)
            .values(&links)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }

    Ok(existing)
}

async fn categories_by_product(
    conn: &mut AsyncPgConnection,
    product_ids: Vec<i64>,
) -> AppResult<HashMap<i64, Vec<CategoryRef>>> {
    let links: Vec<(i64, CategoryRef)> = product_categories::table
        .inner_join(categories::table)
        .filter(product_categories::product_id.eq_any(product_ids))
        .order((product_categories::product_id.asc(), categories::id.asc()))
        .select((product_categories::product_id, (categories::id, categories::name)))
        .load(conn)
        .await?;

    let mut grouped: HashMap<i64, Vec<CategoryRef>> = HashMap::new();
    for (product_id, category) in links {
        grouped.entry(product_id).or_default().push(category);
    }
    Ok(grouped)
}

fn join_rows(product: Product, categories: Vec<CategoryRef>) -> Vec<CatalogRow> {
    if categories.is_empty() {
        return vec![CatalogRow {
            product,
            category: None,
        }];
    }
    categories
        .into_iter()
        .map(|category| CatalogRow {
            product: product.clone(),
            category: Some(category),
        })
        .collect()
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;

    use super::*;

    fn page_sql(criteria: &SearchCriteria, page: PageRequest) -> String {
        debug_query::<Pg, _>(&page_query(criteria, page)).to_string()
    }

    fn position(sql: &str, fragment: &str) -> usize {
        sql.find(fragment)
            .unwrap_or_else(|| panic!("`{}` not found in {}", fragment, sql))
    }

    #[test]
    fn test_page_query_orders_and_limits_in_sql() {
        let criteria = SearchCriteria {
            sort_field: Some("brand".to_string()),
            sort_direction: Some("asc".to_string()),
            ..Default::default()
        };
        let sql = page_sql(&criteria, PageRequest::new(2, 10));

        let by_brand = position(&sql, r#"lower("products"."brand") ASC NULLS LAST"#);
        let newest = position(&sql, r#""products"."created_at" DESC"#);
        let by_id = position(&sql, r#""products"."id" DESC"#);
        assert!(position(&sql, "ORDER BY") < by_brand);
        assert!(by_brand < newest && newest < by_id);
        assert!(by_id < position(&sql, " LIMIT "));
        assert!(sql.contains(" OFFSET "));
    }

    #[test]
    fn test_free_text_orders_by_relevance_before_recency() {
        let criteria = SearchCriteria {
            free_text_query: Some("phone".to_string()),
            ..Default::default()
        };
        let sql = page_sql(&criteria, PageRequest::new(0, 20));

        let relevance = position(&sql, "CASE WHEN products.name ILIKE");
        assert!(sql.contains("THEN 3.0 ELSE 0 END"));
        assert!(sql.contains("1.5 * ("));
        assert!(relevance < position(&sql, r#""products"."created_at" DESC"#));
    }

    #[test]
    fn test_unknown_sort_field_only_orders_by_recency() {
        let criteria = SearchCriteria {
            sort_field: Some("popularity".to_string()),
            ..Default::default()
        };
        let sql = page_sql(&criteria, PageRequest::new(0, 20));

        assert!(!sql.contains("NULLS LAST"));
        assert!(!sql.contains("CASE WHEN"));
        assert!(sql.contains(r#"ORDER BY "products"."created_at" DESC, "products"."id" DESC"#));
    }

    #[test]
    fn test_category_names_are_matched_lowercased_in_sql() {
        let criteria = SearchCriteria {
            category_names: vec!["Phones".to_string()],
            ..Default::default()
        };
        let sql = debug_query::<Pg, _>(&filtered_products(&criteria)).to_string();

        assert!(sql.contains(r#"lower("categories"."name") = ANY("#));
        assert!(sql.contains(r#""phones""#));
        assert!(!sql.contains(r#""Phones""#));
    }

    #[test]
    fn test_count_query_counts_distinct_products() {
        let criteria = SearchCriteria {
            active: Some(true),
            ..Default::default()
        };
        let query = filtered_products(&criteria).select(count_distinct(products::id));
        let sql = debug_query::<Pg, _>(&query).to_string().to_uppercase();

        assert!(sql.contains(r#"COUNT(DISTINCT "PRODUCTS"."ID")"#));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_substring_needles_keep_spaces() {
        let criteria = SearchCriteria {
            name: Some(" Pro".to_string()),
            ..Default::default()
        };
        let sql = debug_query::<Pg, _>(&filtered_products(&criteria)).to_string();

        assert!(sql.contains(r#""% Pro%""#));
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("phone"), "%phone%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("usb_c"), "%usb\\_c%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
