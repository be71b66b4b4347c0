//! Product service: catalog maintenance and search.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, UpdateProduct};
use crate::repositories::ProductRepository;
use crate::search::{self, CatalogSource, PageRequest, ProductSummary, SearchCriteria, SearchPage};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    source: Arc<dyn CatalogSource>,
}

impl ProductService {
    /// Creates a service whose searches read from the product repository.
    pub fn new(repo: ProductRepository) -> Self {
        let source = Arc::new(repo.clone());
        Self { repo, source }
    }

    /// Runs a product search.
    ///
    /// # Errors
    /// `SearchUnavailable` when the catalog cannot be queried
    pub async fn search(&self, criteria: &SearchCriteria, page: PageRequest) -> AppResult<SearchPage> {
        search::search(self.source.as_ref(), criteria, page).await
    }

    /// Creates a product linked to the existing categories among `category_ids`.
    pub async fn create_product(
        &self,
        new_product: NewProduct,
        category_ids: Vec<i64>,
    ) -> AppResult<ProductSummary> {
        let (product, categories) = self.repo.create(new_product, category_ids).await?;
        tracing::info!(
            product_id = product.id,
            categories = categories.len(),
            "Product created"
        );
        Ok(ProductSummary {
            product,
            categories,
            relevance_score: None,
        })
    }

    pub async fn get_product(&self, id: i64) -> AppResult<ProductSummary> {
        let product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("product", id))?;
        let categories = self
            .repo
            .find_categories(vec![id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(ProductSummary {
            product,
            categories,
            relevance_score: None,
        })
    }

    /// Lists products with their categories.
    ///
    /// # Returns
    /// A tuple of (products, total_count)
    pub async fn list_products_paginated(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ProductSummary>, i64)> {
        let (products, total) = self.repo.list_paginated(offset, limit).await?;
        let mut categories = self
            .repo
            .find_categories(products.iter().map(|p| p.id).collect())
            .await?;

        let items = products
            .into_iter()
            .map(|product| ProductSummary {
                categories: categories.remove(&product.id).unwrap_or_default(),
                product,
                relevance_score: None,
            })
            .collect();

        Ok((items, total))
    }

    /// Replaces a product; `category_ids` of `Some` replaces its categories too.
    pub async fn update_product(
        &self,
        id: i64,
        update_data: UpdateProduct,
        category_ids: Option<Vec<i64>>,
    ) -> AppResult<ProductSummary> {
        self.repo
            .update(id, update_data, category_ids)
            .await?
            .ok_or_else(|| AppError::not_found("product", id))?;
        self.get_product(id).await
    }

    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        if self.repo.soft_delete(id).await? == 0 {
            return Err(AppError::not_found("product", id));
        }
        tracing::info!(product_id = id, "Product deactivated");
        Ok(())
    }
}
