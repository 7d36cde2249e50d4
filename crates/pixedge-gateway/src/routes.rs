//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Service endpoints
        .route("/health", get(handlers::health_check))

        // Image endpoints. The bare prefixes exist so a missing key is a
        // 400 rather than a 404.
        .route("/images", get(handlers::get_image).put(handlers::put_image))
        .route("/images/", get(handlers::get_image).put(handlers::put_image))
        .route("/images/{*key}", get(handlers::get_image).put(handlers::put_image))
        .fallback(handlers::not_found)

        // Apply middleware
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Uploads enforce their own ceiling while streaming
        .layer(DefaultBodyLimit::disable());

    if state.config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
        router = router.layer(cors);
    }

    router.with_state(state)
}
