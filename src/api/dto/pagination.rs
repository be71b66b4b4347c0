//! Pagination DTOs for the CRUD listing endpoints.
//!
//! Listings are 1-based (`page`, `page_size`); product search keeps its own
//! zero-based paging in `search.rs`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for pagination.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: u32,
}

impl PaginationParams {
    /// Row offset for database queries.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// Generic paged response wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResponse<T> {
    /// The data items for this page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: u32,

    /// Number of items per page
    #[schema(example = 20)]
    pub page_size: u32,

    /// Total number of items across all pages
    #[schema(example = 100)]
    pub total_items: u64,

    /// Total number of pages
    #[schema(example = 5)]
    pub total_pages: u32,

    #[schema(example = true)]
    pub has_next: bool,

    #[schema(example = false)]
    pub has_prev: bool,
}

impl<T> PagedResponse<T> {
    /// Creates a new paged response.
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: u64) -> Self {
        let page_size = u64::from(params.page_size.max(1));
        let total_pages = u32::try_from(total_items.div_ceil(page_size)).unwrap_or(u32::MAX);

        Self {
            data,
            pagination: PaginationMeta {
                page: params.page,
                page_size: params.page_size,
                total_items,
                total_pages,
                has_next: params.page < total_pages,
                has_prev: params.page > 1,
            },
        }
    }

    /// Converts a `(rows, total)` pair from a service into a response.
    pub fn from_rows<R>(rows: Vec<R>, total: i64, params: &PaginationParams) -> Self
    where
        T: From<R>,
    {
        let data = rows.into_iter().map(T::from).collect();
        Self::new(data, params, u64::try_from(total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: u32, page_size: u32) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_offset_and_limit() {
        assert_eq!(params(1, 20).offset(), 0);
        assert_eq!(params(3, 10).offset(), 20);
        assert_eq!(params(3, 10).limit(), 10);
    }

    #[test]
    fn test_page_metadata() {
        let response = PagedResponse::new(vec![1, 2, 3], &params(2, 10), 25);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_next);
        assert!(response.pagination.has_prev);

        let last = PagedResponse::new(vec![1], &params(3, 10), 25);
        assert!(!last.pagination.has_next);
    }

    #[test]
    fn test_empty_listing_has_no_pages() {
        let response = PagedResponse::<u8>::new(vec![], &params(1, 20), 0);
        assert_eq!(response.pagination.total_pages, 0);
        assert!(!response.pagination.has_next);
        assert!(!response.pagination.has_prev);
    }

    #[test]
    fn test_defaults_and_validation() {
        let defaults = PaginationParams::default();
        assert_eq!((defaults.page, defaults.page_size), (1, 20));
        assert!(params(0, 20).validate().is_err());
        assert!(params(1, 101).validate().is_err());
        assert!(params(1, 100).validate().is_ok());
    }
}
