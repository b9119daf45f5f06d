use axum::{Router, routing::get};

pub mod books;
pub mod system;
pub mod users;

/// Router for the full API surface.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/users", users::router())
        .nest("/books", books::router())
}
