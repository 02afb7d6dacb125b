//! Product handlers.
//!
//! Every route here sits behind the auth middleware; the owner passed to
//! the service is always the authenticated caller.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{
    MSG_PRODUCT_CREATED, MSG_PRODUCT_DELETED, MSG_PRODUCT_NOT_FOUND, MSG_PRODUCT_UPDATED,
};
use crate::domain::{FieldErrors, Product, ProductDraft, Rules, Validate};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Create or full-replace payload. All four fields are required.
///
/// Fields are taken as raw JSON so a wrong type is reported against its
/// field. `price` and `quantity` also accept numeric strings.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[schema(value_type = Option<String>, example = "Widget")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "Acme")]
    pub company: Option<Value>,
    #[schema(value_type = Option<f64>, example = 9.99)]
    pub price: Option<Value>,
    #[schema(value_type = Option<i32>, example = 3)]
    pub quantity: Option<Value>,
}

impl Validate for ProductRequest {
    type Valid = ProductDraft;

    fn validate(self) -> Result<ProductDraft, FieldErrors> {
        let mut rules = Rules::new();
        let name = rules.required_string("name", self.name);
        let company = rules.required_text("company", self.company);
        let price = rules.numeric("price", self.price);
        let quantity = rules.integer("quantity", self.quantity);

        match (name, company, price, quantity) {
            (Some(name), Some(company), Some(price), Some(quantity)) => Ok(ProductDraft {
                name,
                company,
                price,
                quantity,
            }),
            _ => Err(rules.into_errors()),
        }
    }
}

/// Ids that are not UUIDs cannot name a stored product.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(MSG_PRODUCT_NOT_FOUND.to_string()))
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List the caller's products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Products owned by the caller", body = Vec<Product>),
        (status = 401, description = "Missing, invalid or revoked token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.product_service.list(current.user.id).await?;
    Ok(Json(products))
}

/// Create a product owned by the caller
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Created; body is `{success, message, data}`", body = Product),
        (status = 401, description = "Missing, invalid or revoked token"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(draft): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.product_service.create(current.user.id, draft).await?;
    Ok(Json(ApiResponse::with_message(product, MSG_PRODUCT_CREATED)))
}

/// Get one of the caller's products
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 401, description = "Missing, invalid or revoked token"),
        (status = 404, description = "Sorry, product not found.")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .product_service
        .show(current.user.id, parse_id(&id)?)
        .await?;
    Ok(Json(product))
}

/// Replace all fields of one of the caller's products
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated; body is `{success, message, data}`", body = Product),
        (status = 401, description = "Missing, invalid or revoked token"),
        (status = 404, description = "Sorry, product not found."),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(draft): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .product_service
        .update(current.user.id, parse_id(&id)?, draft)
        .await?;
    Ok(Json(ApiResponse::with_message(product, MSG_PRODUCT_UPDATED)))
}

/// Delete one of the caller's products
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 401, description = "Missing, invalid or revoked token"),
        (status = 404, description = "Sorry, product not found.")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .product_service
        .delete(current.user.id, parse_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::message(MSG_PRODUCT_DELETED)))
}
