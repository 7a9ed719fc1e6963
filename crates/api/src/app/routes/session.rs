use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use stockbook_core::Error;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Authenticate. A failed login is 401 here, unlike the 403 a failed
/// workflow gate produces.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(&body.email, &body.credential).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(Error::Unauthorized(msg)) => {
            errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", msg)
        }
        Err(e) => errors::error_to_response(e),
    }
}
