use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockbook_catalog::{CategoryUpdate, NewCategory};
use stockbook_core::CategoryId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewCategory>,
) -> axum::response::Response {
    let category = match body.build() {
        Ok(c) => c,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().insert_category(&category).await {
        Ok(()) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<CategoryUpdate>,
) -> axum::response::Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().update_category(id, body).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().delete_category(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
