mod error;
mod extractors;
mod handlers;

pub use error::ApiError;
pub use extractors::JsonBody;

use std::path::Path;

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::ConnectionManager;

pub fn create_router(store: ConnectionManager) -> Router {
    Router::new()
        // Cats
        .route("/cats", get(handlers::list_cats).post(handlers::create_cat))
        .route("/cats/{id}", delete(handlers::delete_cat))
        // Care logs
        .route(
            "/cats/{cat_id}/logs",
            get(handlers::list_logs_for_cat).post(handlers::create_log),
        )
        .route("/logs/{id}", put(handlers::update_log))
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Serve the front-end from `dir` for any path the API does not handle.
pub fn with_static_dir(router: Router, dir: &Path) -> Router {
    router.fallback_service(ServeDir::new(dir))
}
