//! API Routes
//!
//! Configures the Axum router with all browser endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    children_handler, health_handler, invalidate_all_handler, invalidate_project_handler,
    preload_handler, projects_handler, resources_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/projects", get(projects_handler))
        .route("/projects/:project", delete(invalidate_project_handler))
        .route("/projects/:project/:kind", get(resources_handler))
        .route("/projects/:project/:kind/:parent", get(children_handler))
        .route("/state", delete(invalidate_all_handler))
        .route("/preload", post(preload_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
