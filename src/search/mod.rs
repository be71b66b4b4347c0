//! Product search.
//!
//! A [`CatalogSource`] filters, orders and pages the catalog where it is
//! stored, returning one page of products joined with their categories.
//! [`SearchEvaluator`] folds that page and scores it. It also carries the
//! full in-memory search that every source must agree with. Each call is
//! independent; nothing is cached.

mod criteria;
mod evaluator;
mod sort;
mod source;

#[cfg(test)]
mod tests;

pub use criteria::{MAX_PAGE_SIZE, MIN_PAGE_SIZE, PageRequest, SearchCriteria};
pub use evaluator::{
    BRAND_WEIGHT, CATEGORY_WEIGHT, CatalogRow, DESCRIPTION_WEIGHT, MODEL_WEIGHT, NAME_WEIGHT,
    ProductSummary, SearchEvaluator, SearchPage,
};
pub use sort::{SortDirection, SortKey, SortPlan, SortSpec};
pub use source::{CatalogPage, CatalogSource};

use crate::error::{AppError, AppResult};

/// Runs a search against `source`.
///
/// # Errors
///
/// Storage failures from the source surface as `AppError::SearchUnavailable`.
pub async fn search(
    source: &dyn CatalogSource,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> AppResult<SearchPage> {
    let fetched = source
        .fetch_page(criteria, page)
        .await
        .map_err(AppError::into_search_unavailable)?;
    let page_rows = fetched.rows.len();

    let result = SearchEvaluator::new(criteria).score_page(fetched, page);

    tracing::debug!(
        page_rows,
        total_count = result.total_count,
        page_index = page.index(),
        page_size = page.size(),
        "Product search evaluated"
    );

    Ok(result)
}
