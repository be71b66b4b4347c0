//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user`, `category`, `product`, `order` - CRUD request/response DTOs
//! - `search` - Product search criteria and result page
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod category;
pub(crate) mod decimal;
mod error;
mod health;
mod order;
mod pagination;
mod product;
mod search;
mod user;

pub use category::{CategoryRefResponse, CategoryRequest, CategoryResponse};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use order::{OrderDetailResponse, OrderItemResponse, OrderResponse};
pub use pagination::{PagedResponse, PaginationMeta, PaginationParams};
pub use product::{ProductRequest, ProductResponse};
pub use search::{ProductSearchRequest, ProductSummaryResponse, SearchPageParams, SearchPageResponse};
pub use user::{UserFilter, UserRequest, UserResponse};
