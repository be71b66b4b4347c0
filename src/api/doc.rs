use utoipa::OpenApi;

pub const USER_TAG: &str = "Users";
pub const CATEGORY_TAG: &str = "Categories";
pub const PRODUCT_TAG: &str = "Products";
pub const ORDER_TAG: &str = "Orders";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog",
        description = "Catalog CRUD and product search API",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::models::OrderStatus,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = CATEGORY_TAG, description = "Category management endpoints"),
        (name = PRODUCT_TAG, description = "Product management and search endpoints"),
        (name = ORDER_TAG, description = "Order read endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
