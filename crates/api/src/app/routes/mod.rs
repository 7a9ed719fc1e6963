use axum::{
    Router,
    routing::{get, post},
};

pub mod categories;
pub mod movements;
pub mod products;
pub mod requests;
pub mod session;
pub mod suppliers;
pub mod system;
pub mod users;
pub mod warehouses;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/initialize", get(system::initialize))
        .route("/login", post(session::login))
        .nest("/movements", movements::router())
        .nest("/purchase-requests", requests::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/suppliers", suppliers::router())
        .nest("/warehouses", warehouses::router())
}
