use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use stockbook_ledger::NewMovement;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

const DEFAULT_RECENT_LIMIT: i64 = 200;

pub fn router() -> Router {
    Router::new().route("/", post(record_movement).get(recent_movements))
}

pub async fn record_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewMovement>,
) -> axum::response::Response {
    match services.record_movement(body).await {
        Ok((movement, stock)) => (
            StatusCode::CREATED,
            Json(dto::MovementRecorded { movement, stock }),
        )
            .into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn recent_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LimitQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    if limit <= 0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "limit must be positive",
        );
    }
    match services.recent_movements(limit).await {
        Ok(movements) => (StatusCode::OK, Json(movements)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
