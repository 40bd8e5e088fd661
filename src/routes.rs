// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{books, health},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the book resource under `/books` and the probe under `/health`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/{isbn}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/health", get(health::health_check))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
