use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Everything a client needs for its initial screen, in one response.
pub async fn initialize(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
