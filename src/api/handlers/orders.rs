//! Order request handlers (read-only).

use axum::{
    Json,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ORDER_TAG;
use crate::api::dto::{ErrorResponse, OrderDetailResponse};
use crate::error::AppResult;
use crate::state::AppState;

pub fn order_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_order))
}

/// GET /api/orders/{id} - Get order with its items
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ORDER_TAG,
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderDetailResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetailResponse>> {
    let details = state.services.orders.get_order(id).await?;
    Ok(Json(OrderDetailResponse::from(details)))
}
