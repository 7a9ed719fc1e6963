use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockbook_catalog::{NewSupplier, SupplierUpdate};
use stockbook_core::SupplierId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", put(update_supplier).delete(delete_supplier))
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_suppliers().await {
        Ok(suppliers) => (StatusCode::OK, Json(suppliers)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewSupplier>,
) -> axum::response::Response {
    let supplier = match body.build() {
        Ok(s) => s,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().insert_supplier(&supplier).await {
        Ok(()) => (StatusCode::CREATED, Json(supplier)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<SupplierUpdate>,
) -> axum::response::Response {
    let id: SupplierId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().update_supplier(id, body).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().delete_supplier(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
