//! Category request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{
    CategoryRequest, CategoryResponse, ErrorResponse, PagedResponse, PaginationParams,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories, create_category))
        .routes(routes!(list_active_categories))
        .routes(routes!(get_category, update_category, delete_category))
}

/// GET /api/categories - List categories by id
#[utoipa::path(
    get,
    path = "/",
    tag = CATEGORY_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated list of categories", body = PagedResponse<CategoryResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_categories(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<CategoryResponse>>> {
    let (categories, total) = state
        .services
        .categories
        .list_categories_paginated(params.offset(), params.limit())
        .await?;
    Ok(Json(PagedResponse::from_rows(categories, total, &params)))
}

/// GET /api/categories/active - Active categories ordered by name
#[utoipa::path(
    get,
    path = "/active",
    tag = CATEGORY_TAG,
    responses(
        (status = 200, description = "Active categories", body = Vec<CategoryResponse>)
    )
)]
async fn list_active_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.services.categories.list_active_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// POST /api/categories - Create category
#[utoipa::path(
    post,
    path = "/",
    tag = CATEGORY_TAG,
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let details = state
        .services
        .categories
        .create_category(payload.into_new_category())
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(details))))
}

/// GET /api/categories/{id} - Get category with its product count
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryResponse>> {
    let details = state.services.categories.get_category(id).await?;
    Ok(Json(CategoryResponse::from(details)))
}

/// PUT /api/categories/{id} - Replace category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let details = state
        .services
        .categories
        .update_category(id, payload.into_update_category())
        .await?;
    Ok(Json(CategoryResponse::from(details)))
}

/// DELETE /api/categories/{id} - Deactivate category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORY_TAG,
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deactivated"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.categories.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
