use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockbook_catalog::{NewProduct, ProductUpdate};
use stockbook_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route("/:id/stock", get(product_stock))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    let product = match body.build() {
        Ok(p) => p,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().insert_product(&product).await {
        Ok(()) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductUpdate>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().update_product(id, body).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn product_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.current_stock(id).await {
        Ok(stock) => (
            StatusCode::OK,
            Json(dto::StockResponse {
                product_id: id,
                stock,
            }),
        )
            .into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
