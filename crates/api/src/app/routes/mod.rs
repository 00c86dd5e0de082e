use axum::{routing::get, Router};

pub mod products;
pub mod system;
pub mod ui;

/// Router for every endpoint the service exposes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/ui", get(ui::page))
        .nest("/products", products::router())
}
