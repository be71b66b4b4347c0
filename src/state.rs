//! Shared state handed to every Axum handler.

use crate::config::SearchConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Cloning is cheap: the services and the pool are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used directly by the readiness probe.
    pub db_pool: AsyncDbPool,
    /// Paging limits for product search.
    pub search: SearchConfig,
}

impl AppState {
    /// Wires repositories and services on top of `pool`.
    ///
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.search.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, search: SearchConfig) -> Self {
        let repos = Repositories::new(pool.clone());
        Self {
            services: Services::new(repos),
            db_pool: pool,
            search,
        }
    }
}
