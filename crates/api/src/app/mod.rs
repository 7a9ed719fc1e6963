//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: the operations behind the routes, composed from the
//!   access gate and the store
//! - `routes/`: HTTP handlers, one file per domain area
//! - `dto.rs`: request DTOs and JSON response mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use stockbook_store::Store;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: Store) -> Router {
    let services = Arc::new(services::AppServices::new(store));
    routes::router().layer(Extension(services))
}
