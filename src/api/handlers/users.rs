//! User CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ErrorResponse, OrderResponse, PagedResponse, PaginationParams, UserFilter, UserRequest,
    UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates user-related routes.
///
/// Routes:
/// - GET /              - List users
/// - POST /             - Create a new user
/// - GET /{id}          - Get user by ID
/// - PUT /{id}          - Replace user by ID
/// - DELETE /{id}       - Deactivate user by ID
/// - GET /{id}/orders   - List the user's orders
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
        .routes(routes!(list_user_orders))
}

/// GET /api/users - List users
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Paginated list of users", body = PagedResponse<UserResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
    ValidatedQuery(filter): ValidatedQuery<UserFilter>,
) -> AppResult<Json<PagedResponse<UserResponse>>> {
    let (users, total) = state
        .services
        .users
        .list_users_paginated(filter.active, params.offset(), params.limit())
        .await?;
    Ok(Json(PagedResponse::from_rows(users, total, &params)))
}

/// POST /api/users - Create new user
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let details = state
        .services
        .users
        .create_user(payload.into_new_user())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(details))))
}

/// GET /api/users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<UserResponse>> {
    let details = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(details)))
}

/// PUT /api/users/{id} - Replace user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    let details = state
        .services
        .users
        .update_user(id, payload.into_update_user())
        .await?;
    Ok(Json(UserResponse::from(details)))
}

/// DELETE /api/users/{id} - Deactivate user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/orders - List a user's orders, newest first
#[utoipa::path(
    get,
    path = "/{id}/orders",
    tag = USER_TAG,
    params(("id" = i64, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = PagedResponse<OrderResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn list_user_orders(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<OrderResponse>>> {
    let (orders, total) = state
        .services
        .orders
        .list_user_orders(id, params.offset(), params.limit())
        .await?;
    Ok(Json(PagedResponse::from_rows(orders, total, &params)))
}
