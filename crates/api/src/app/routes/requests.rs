use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use stockbook_core::RequestId;
use stockbook_procurement::NewRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request))
        .route(
            "/:id",
            axum::routing::put(transition_request).delete(delete_request),
        )
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewRequest>,
) -> axum::response::Response {
    match services.create_request(body).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn transition_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::TransitionRequest>,
) -> axum::response::Response {
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services
        .transition_request(id, body.status, &body.caller_email)
        .await
    {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_request(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.delete_request(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
