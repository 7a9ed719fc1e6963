use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_core::Error;

/// Map a domain error onto the wire envelope.
///
/// `Unauthorized` becomes 403 here: the caller is known but not allowed.
/// Login is the one place where it means a failed authentication instead,
/// so the login handler maps it to 401 itself.
pub fn error_to_response(err: Error) -> axum::response::Response {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Unauthorized(_) => StatusCode::FORBIDDEN,
        Error::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.kind(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
