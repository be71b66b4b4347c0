//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod category_service;
mod order_service;
mod product_service;
mod user_service;

pub use category_service::{CategoryDetails, CategoryService};
pub use order_service::{OrderDetails, OrderService};
pub use product_service::ProductService;
pub use user_service::{UserDetails, UserService};

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub categories: CategoryService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            categories: CategoryService::new(repos.categories),
            products: ProductService::new(repos.products),
            orders: OrderService::new(repos.orders, repos.users),
        }
    }
}
