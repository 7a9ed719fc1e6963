use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockbook_catalog::{NewUser, UserUpdate};
use stockbook_core::EmailAddress;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:email", put(update_user).delete(delete_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_users().await {
        Ok(users) => {
            let public: Vec<_> = users.iter().map(|u| u.public()).collect();
            (StatusCode::OK, Json(public)).into_response()
        }
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    let user = match body.build() {
        Ok(u) => u,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().insert_user(&user).await {
        Ok(()) => (StatusCode::CREATED, Json(user.public())).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
    Json(body): Json<UserUpdate>,
) -> axum::response::Response {
    let email: EmailAddress = match email.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().update_user(&email, body).await {
        Ok(user) => (StatusCode::OK, Json(user.public())).into_response(),
        Err(e) => errors::error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
) -> axum::response::Response {
    let email: EmailAddress = match email.parse() {
        Ok(v) => v,
        Err(e) => return errors::error_to_response(e),
    };
    match services.store().delete_user(&email).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::error_to_response(e),
    }
}
