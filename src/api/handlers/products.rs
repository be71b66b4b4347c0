//! Product request handlers, including the multi-filter search.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PRODUCT_TAG;
use crate::api::dto::{
    ErrorResponse, PagedResponse, PaginationParams, ProductRequest, ProductResponse,
    ProductSearchRequest, SearchPageParams, SearchPageResponse,
};
use crate::error::AppResult;
use crate::search::SearchCriteria;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates product-related routes.
///
/// Routes:
/// - POST /search   - Search products
/// - GET /          - List products
/// - POST /         - Create product
/// - GET /{id}      - Get product by ID
/// - PUT /{id}      - Replace product by ID
/// - DELETE /{id}   - Deactivate product by ID
pub fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_products))
        .routes(routes!(list_products, create_product))
        .routes(routes!(get_product, update_product, delete_product))
}

/// POST /api/products/search - Search products
///
/// All criteria are optional and combined with AND. Results are one row
/// per product; `relevanceScore` is present only for free-text searches.
#[utoipa::path(
    post,
    path = "/search",
    tag = PRODUCT_TAG,
    params(SearchPageParams),
    request_body = ProductSearchRequest,
    responses(
        (status = 200, description = "One page of matching products", body = SearchPageResponse),
        (status = 400, description = "Invalid paging or malformed body", body = ErrorResponse),
        (status = 503, description = "Search unavailable", body = ErrorResponse)
    )
)]
async fn search_products(
    State(state): State<AppState>,
    ValidatedQuery(paging): ValidatedQuery<SearchPageParams>,
    ValidatedJson(payload): ValidatedJson<ProductSearchRequest>,
) -> AppResult<Json<SearchPageResponse>> {
    let page = paging.page_request(&state.search)?;
    let criteria = SearchCriteria::from(payload);
    let result = state.services.products.search(&criteria, page).await?;
    Ok(Json(SearchPageResponse::from(result)))
}

/// GET /api/products - List products
#[utoipa::path(
    get,
    path = "/",
    tag = PRODUCT_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated list of products", body = PagedResponse<ProductResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_products(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<ProductResponse>>> {
    let (products, total) = state
        .services
        .products
        .list_products_paginated(params.offset(), params.limit())
        .await?;
    Ok(Json(PagedResponse::from_rows(products, total, &params)))
}

/// POST /api/products - Create product
#[utoipa::path(
    post,
    path = "/",
    tag = PRODUCT_TAG,
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let (new_product, category_ids) = payload.into_new_product();
    let summary = state
        .services
        .products
        .create_product(new_product, category_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(summary))))
}

/// GET /api/products/{id} - Get product with its categories
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductResponse>> {
    let summary = state.services.products.get_product(id).await?;
    Ok(Json(ProductResponse::from(summary)))
}

/// PUT /api/products/{id} - Replace product
///
/// When `category_ids` is present the product's categories are replaced.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i64, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let (update_data, category_ids) = payload.into_update_product();
    let summary = state
        .services
        .products
        .update_product(id, update_data, category_ids)
        .await?;
    Ok(Json(ProductResponse::from(summary)))
}

/// DELETE /api/products/{id} - Deactivate product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deactivated"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
