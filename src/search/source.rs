use async_trait::async_trait;

use crate::error::AppResult;
use crate::search::{CatalogRow, PageRequest, SearchCriteria};

/// One requested page of matching products, joined with their categories,
/// plus the number of distinct products matching overall.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub rows: Vec<CatalogRow>,
    pub total_count: u64,
}

/// Runs the filtering, ordering and paging of a search against a store.
///
/// Rows come back in result order, and only for products on the requested
/// page. The order and the count must match what
/// [`SearchEvaluator::evaluate`](crate::search::SearchEvaluator::evaluate)
/// produces over the same catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, criteria: &SearchCriteria, page: PageRequest) -> AppResult<CatalogPage>;
}
