use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockbook_catalog::{NewWarehouse, WarehouseUpdate};
use stockbook_core::WarehouseId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_warehouses).post(create_warehouse))
        .route("/:id", put(update_warehouse).delete(delete_warehouse))
}

pub async fn list_warehouses(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_warehouses().await {
        Ok(warehouses) => (StatusCode::OK, Json(warehouses)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn create_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewWarehouse>,
) -> axum::response::Response {
    let warehouse = match body.build() {
        Ok(w) => w,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().insert_warehouse(&warehouse).await {
        Ok(()) => (StatusCode::CREATED, Json(warehouse)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn update_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<WarehouseUpdate>,
) -> axum::response::Response {
    let id: WarehouseId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().update_warehouse(id, body).await {
        Ok(warehouse) => (StatusCode::OK, Json(warehouse)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: WarehouseId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().delete_warehouse(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
